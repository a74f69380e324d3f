/// Trait for formatting different types of data
pub trait Formatter<T> {
    fn format(&self, input: T) -> String;
}

/// Formatter that hides all but the edges of a secret, for log output
pub struct SecretFormatter {
    /// Characters kept visible at each end
    pub visible: usize,
}

impl Default for SecretFormatter {
    fn default() -> Self {
        Self { visible: 4 }
    }
}

impl Formatter<&str> for SecretFormatter {
    /// Format a secret as `head...tail`, or `****` if it is too short to show any of it
    fn format(&self, secret: &str) -> String {
        let chars: Vec<char> = secret.chars().collect();
        if chars.len() <= self.visible * 2 {
            return "****".to_string();
        }

        let head: String = chars[..self.visible].iter().collect();
        let tail: String = chars[chars.len() - self.visible..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

// Convenience function used by the API client's debug logging
pub fn mask_secret(secret: &str) -> String {
    SecretFormatter::default().format(secret)
}
