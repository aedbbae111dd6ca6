use num_traits::One;
use rug::Integer;

/// Produces a bitmask (as an [`Integer`]) encoding `(1 << n) - 1`
/// which can be used to extract the first `n` binary digits.
pub(crate) fn bitmask(n: usize) -> Integer {
    (Integer::one() << n) - Integer::one()
}
