/*!
The single-assignment cache that holds an option's resolved value.

A [`Binding`] moves through three states. It starts [`Unbound`], when the
option has been declared but not attached to any command. Attaching it makes it
[`Pending`]: it's waiting for its command's parse pass. A successful finalize
makes it [`Resolved`]. Starting another parse pass drops it back to `Pending`,
so the next finalize overwrites rather than appends.

[`Unbound`]: Binding::Unbound
[`Pending`]: Binding::Pending
[`Resolved`]: Binding::Resolved
 */

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding<T> {
    /// Declared, but not attached to a command
    Unbound,

    /// Attached, awaiting a parse pass
    Pending,

    /// Finalized for the current parse pass
    Resolved(T),
}

impl<T> Default for Binding<T> {
    fn default() -> Self {
        Self::Unbound
    }
}

impl<T> Binding<T> {
    #[inline]
    #[must_use]
    pub fn is_attached(&self) -> bool {
        !matches!(self, Self::Unbound)
    }

    #[inline]
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// Move from `Unbound` to `Pending`. Returns false, leaving `self`
    /// untouched, if this binding was already attached.
    pub fn attach(&mut self) -> bool {
        match self {
            Self::Unbound => {
                *self = Self::Pending;
                true
            }
            Self::Pending | Self::Resolved(_) => false,
        }
    }

    /// Start a new parse pass, discarding any value from a previous one.
    /// Returns false if this binding was never attached.
    pub fn begin_pass(&mut self) -> bool {
        match self {
            Self::Unbound => false,
            Self::Pending | Self::Resolved(_) => {
                *self = Self::Pending;
                true
            }
        }
    }

    /// Store the value for the current parse pass.
    pub fn resolve(&mut self, value: T) {
        debug_assert!(
            matches!(self, Self::Pending),
            "a binding must be pending before it can be resolved"
        );

        *self = Self::Resolved(value);
    }

    /// Get the resolved value, if there is one.
    #[inline]
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        match self {
            Self::Resolved(value) => Some(value),
            Self::Unbound | Self::Pending => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle() {
        let mut binding = Binding::default();
        assert!(!binding.is_attached());
        assert_eq!(binding.get(), None);

        assert!(!binding.begin_pass());
        assert!(binding.attach());
        assert!(!binding.attach());
        assert_eq!(binding.get(), None);

        assert!(binding.begin_pass());
        binding.resolve(3);
        assert_eq!(binding.get(), Some(&3));
        assert_eq!(binding.get(), Some(&3));

        assert!(binding.begin_pass());
        assert!(!binding.is_resolved());
        binding.resolve(4);
        assert_eq!(binding.get(), Some(&4));
    }
}
