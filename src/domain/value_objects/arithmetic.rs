//! # Checked Arithmetic
//!
//! Overflow-checked decimal arithmetic for money calculations.
//!
//! # Examples
//!
//! ```
//! use offer_negotiation::domain::value_objects::arithmetic::CheckedArithmetic;
//! use rust_decimal::Decimal;
//!
//! let price = Decimal::new(10000, 2);
//! let ratio = Decimal::new(5, 1);
//! assert_eq!(price.safe_mul(ratio).unwrap(), Decimal::new(5000, 2));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

/// Error type for arithmetic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ArithmeticError {
    /// Arithmetic operation resulted in overflow.
    #[error("arithmetic overflow")]
    Overflow,
}

/// Result type for arithmetic operations.
pub type ArithmeticResult<T> = Result<T, ArithmeticError>;

/// Checked arithmetic that reports failures instead of panicking.
pub trait CheckedArithmetic: Sized {
    /// Multiplies, failing on overflow.
    ///
    /// # Errors
    ///
    /// Returns [`ArithmeticError::Overflow`] if the product is not representable.
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self>;
}

impl CheckedArithmetic for Decimal {
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_mul(rhs).ok_or(ArithmeticError::Overflow)
    }
}
