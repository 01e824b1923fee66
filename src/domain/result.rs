//! Result type alias for HealthNet

use super::errors::HealthNetError;

/// Result type alias for HealthNet operations
///
/// # Examples
///
/// ```
/// use healthnet::domain::result::Result;
/// use healthnet::domain::errors::HealthNetError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(HealthNetError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, HealthNetError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::HealthNetError;

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(HealthNetError::Validation("test error".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
