use serde::{Deserialize, Serialize};

/// On/off switch for optional provider behaviour (e.g. unrestricted egress).
///
/// Serialized as a bare boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Flag(bool);

impl Flag {
    pub const fn enabled() -> Self {
        Self(true)
    }

    pub const fn disabled() -> Self {
        Self(false)
    }

    pub const fn is_enabled(&self) -> bool {
        self.0
    }
}

/// Provider default for toggles is "on".
impl Default for Flag {
    fn default() -> Self {
        Self::enabled()
    }
}

impl From<bool> for Flag {
    fn from(b: bool) -> Self {
        Self(b)
    }
}

#[cfg(test)]
mod tests {
    use super::Flag;

    #[test]
    fn defaults_to_enabled() {
        assert!(Flag::default().is_enabled());
        assert!(!Flag::disabled().is_enabled());
        assert_eq!(Flag::from(false), Flag::disabled());
    }

    #[test]
    fn missing_field_falls_back_to_enabled() {
        #[derive(serde::Deserialize)]
        struct Holder {
            #[serde(default)]
            egress: Flag,
        }

        let h: Holder = serde_json::from_str("{}").unwrap();
        assert!(h.egress.is_enabled());

        let h: Holder = serde_json::from_str(r#"{"egress":false}"#).unwrap();
        assert!(!h.egress.is_enabled());
    }
}
