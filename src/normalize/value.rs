/// A field after coercion to its expected type.
///
/// `Invalid` means a value was present but could not be coerced. It is kept
/// apart from `Missing` so rules can decide how to treat each case.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Normalized<T> {
    Valid(T),
    Invalid,
    Missing,
}

impl<T> Normalized<T> {
    pub fn valid(&self) -> Option<&T> {
        match self {
            Normalized::Valid(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool { matches!(self, Normalized::Valid(_)) }
    pub fn is_invalid(&self) -> bool { matches!(self, Normalized::Invalid) }
}
