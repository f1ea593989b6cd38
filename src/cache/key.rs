//! Cache keys.

/// A value that names a cache entry.
///
/// Two logically equal keys must produce identical raw values; the byte
/// store uses the raw value as the entry's only identity.
///
/// ```
/// use envelope_cache::cache::Keyable;
///
/// enum Key {
///     Profile(u64),
///     Settings,
/// }
///
/// impl Keyable for Key {
///     fn raw_value(&self) -> String {
///         match self {
///             Key::Profile(id) => format!("profile.{}", id),
///             Key::Settings => "settings".to_string(),
///         }
///     }
/// }
///
/// assert_eq!(Key::Profile(7).raw_value(), "profile.7");
/// assert_eq!(Key::Settings.raw_value(), "settings");
/// ```
pub trait Keyable {
    /// Returns the string identity of this key.
    fn raw_value(&self) -> String;
}

impl Keyable for str {
    fn raw_value(&self) -> String {
        self.to_string()
    }
}

impl Keyable for String {
    fn raw_value(&self) -> String {
        self.clone()
    }
}

impl<K: Keyable + ?Sized> Keyable for &K {
    fn raw_value(&self) -> String {
        (**self).raw_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_keys_match() {
        let owned = String::from("user.42");
        assert_eq!("user.42".raw_value(), owned.raw_value());
        assert_eq!((&owned).raw_value(), "user.42");
    }
}
