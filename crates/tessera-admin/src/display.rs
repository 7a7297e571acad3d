//! Display formatting for CLI output

use console::style;

/// Print a success line with the standard glyph
pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print a warning line
pub fn warning(message: &str) {
    println!("{} {}", style("⚠").yellow().bold(), message);
}

/// Print a dimmed informational note
pub fn note(message: &str) {
    println!("  {}", style(message).dim());
}

/// Format count with proper pluralization
pub fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize(1, "pod", "pods"), "1 pod");
        assert_eq!(pluralize(0, "pod", "pods"), "0 pods");
        assert_eq!(pluralize(3, "pod", "pods"), "3 pods");
    }
}
