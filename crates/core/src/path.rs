//! Generation of the per-attachment path segment used to group blobs.

use uuid::Uuid;

/// Produces a fresh, collision-resistant relative path segment.
pub trait PathGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Derives the segment from a random UUID, fanned out over two directory
/// levels so no single directory collects every attachment:
/// `ab/cd/abcd1234-....`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidPathGenerator;

impl PathGenerator for UuidPathGenerator {
    fn generate(&self) -> String {
        let id = Uuid::new_v4().to_string();
        format!("{}/{}/{id}", &id[0..2], &id[2..4])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_has_fan_out_prefix() {
        let token = UuidPathGenerator.generate();
        let parts: Vec<&str> = token.split('/').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), 2);
        assert_eq!(parts[1].len(), 2);
        assert!(parts[2].starts_with(&format!("{}{}", parts[0], parts[1])));
    }

    #[test]
    fn tokens_are_unique() {
        let generator = UuidPathGenerator;
        assert_ne!(generator.generate(), generator.generate());
    }
}
