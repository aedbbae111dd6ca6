/*!
Typed arithmetic failures.

The default operator surface never fails: posit operations encode
errors as NaR and cfloat operations as NaN (or a saturated value).
The `try_*` entry points on the rounding contexts and the quire expose
the same kernels with these typed errors instead, so both policies
share a single decision point per operation.
*/

use std::error::Error;
use std::fmt;

/// Failure modes of the arithmetic kernels and the quire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithmeticError {
    /// Division of a finite, non-zero value by zero.
    DivideByZero,
    /// Division by the posit NaR encoding.
    DivideByNar,
    /// An operand of the operation is NaR (or NaN).
    OperandIsNar,
    /// Integer-level division with a zero divisor.
    IntegerDivideByZero,
    /// A value's scale lies above the quire's dynamic range.
    OperandTooLargeForQuire,
    /// A value's scale lies below the quire's dynamic range.
    OperandTooSmallForQuire,
}

impl fmt::Display for ArithmeticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DivideByZero => write!(f, "divide by zero"),
            Self::DivideByNar => write!(f, "divide by nar"),
            Self::OperandIsNar => write!(f, "operand is nar"),
            Self::IntegerDivideByZero => write!(f, "integer divide by zero"),
            Self::OperandTooLargeForQuire => {
                write!(f, "operand value too large for quire")
            }
            Self::OperandTooSmallForQuire => {
                write!(f, "operand value too small for quire")
            }
        }
    }
}

impl Error for ArithmeticError {}
