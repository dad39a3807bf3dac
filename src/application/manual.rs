use crate::domain::capability::ThreeState;
use crate::domain::catalog::{Dimension, DimensionCatalog};
use crate::domain::config::{Declaration, ManualConfiguration};

/// Maps the declared configuration for one dimension value to a [`ThreeState`].
///
/// - flags: `true` is supported, `false` unsupported, absent unknown;
/// - lists: the unsupported list wins over the supported list, anything else
///   (including the uncertain list) is unknown;
/// - exact values: a match is supported, anything else unknown, since a
///   declared value for another candidate says nothing about this one.
pub fn normalize(
    config: &ManualConfiguration,
    catalog: &DimensionCatalog,
    dimension: Dimension,
    value: &str,
) -> ThreeState {
    let names = |entry: &str| catalog.canonicalize(dimension, entry).as_deref() == Some(value);

    match config.declaration(dimension, value) {
        Declaration::Flag(Some(true)) => ThreeState::Supported,
        Declaration::Flag(Some(false)) => ThreeState::Unsupported,
        Declaration::Flag(None) => ThreeState::Unknown,
        Declaration::Listed {
            supported,
            unsupported,
            ..
        } => {
            if unsupported.iter().any(|e| names(e.as_str())) {
                ThreeState::Unsupported
            } else if supported.iter().any(|e| names(e.as_str())) {
                ThreeState::Supported
            } else {
                ThreeState::Unknown
            }
        }
        Declaration::Exact(Some(declared)) if names(declared) => ThreeState::Supported,
        Declaration::Exact(_) => ThreeState::Unknown,
    }
}

/// Display remark derived from the declared configuration, if it has any
/// detail about this value. Never used for resolution.
pub fn manual_note(
    config: &ManualConfiguration,
    catalog: &DimensionCatalog,
    dimension: Dimension,
    value: &str,
) -> Option<String> {
    let mut remarks = Vec::new();

    if let (Dimension::VerificationMode, Some(modes)) = (dimension, &config.verification_modes) {
        match (value, modes.no_pin_limit, modes.signature_threshold) {
            ("no_pin", Some(limit), _) => remarks.push(format!(
                "min amount without PIN: {}{}",
                modes.currency(),
                limit.normalize()
            )),
            ("signature", _, Some(threshold)) => remarks.push(format!(
                "signature required above {}{}",
                modes.currency(),
                threshold.normalize()
            )),
            _ => {}
        }
    }

    if let Declaration::Listed { uncertain, .. } = config.declaration(dimension, value)
        && uncertain
            .iter()
            .any(|e| catalog.canonicalize(dimension, e).as_deref() == Some(value))
    {
        remarks.push("declared uncertain".to_string());
    }

    if let Some(note) = config.note(dimension, value) {
        remarks.push(note.to_string());
    }

    if remarks.is_empty() {
        None
    } else {
        Some(remarks.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::{
        AcquiringModeFlags, ListDeclaration, PaymentMethodFlags, VerificationModes,
    };
    use rust_decimal_macros::dec;

    fn state(config: &ManualConfiguration, dimension: Dimension, value: &str) -> ThreeState {
        normalize(config, &DimensionCatalog::new(), dimension, value)
    }

    #[test]
    fn test_flag_dimensions() {
        let config = ManualConfiguration {
            payment_methods: PaymentMethodFlags {
                contactless: Some(true),
                swipe: Some(false),
                ..Default::default()
            },
            acquiring_modes: AcquiringModeFlags {
                edc: None,
                dcc: Some(true),
            },
            ..Default::default()
        };
        assert_eq!(state(&config, Dimension::PaymentMethod, "contactless"), ThreeState::Supported);
        assert_eq!(state(&config, Dimension::PaymentMethod, "swipe"), ThreeState::Unsupported);
        assert_eq!(state(&config, Dimension::PaymentMethod, "chip"), ThreeState::Unknown);
        assert_eq!(state(&config, Dimension::AcquiringMode, "dcc"), ThreeState::Supported);
        assert_eq!(state(&config, Dimension::AcquiringMode, "edc"), ThreeState::Unknown);
    }

    #[test]
    fn test_list_dimensions() {
        let config = ManualConfiguration {
            card_networks: ListDeclaration {
                supported: vec!["visa".into(), "Master".into(), "jcb".into()],
                unsupported: vec!["jcb".into(), "amex".into()],
                uncertain: vec!["unionpay".into()],
            },
            ..Default::default()
        };
        assert_eq!(state(&config, Dimension::CardNetwork, "visa"), ThreeState::Supported);
        assert_eq!(state(&config, Dimension::CardNetwork, "mastercard"), ThreeState::Supported);
        // The unsupported list takes precedence over the supported one.
        assert_eq!(state(&config, Dimension::CardNetwork, "jcb"), ThreeState::Unsupported);
        assert_eq!(state(&config, Dimension::CardNetwork, "amex"), ThreeState::Unsupported);
        assert_eq!(state(&config, Dimension::CardNetwork, "unionpay"), ThreeState::Unknown);
        assert_eq!(state(&config, Dimension::CardNetwork, "discover"), ThreeState::Unknown);
    }

    #[test]
    fn test_exact_dimensions_are_open_world() {
        let config = ManualConfiguration {
            checkout_location: Some("Counter".into()),
            acquiring_institution: Some("Bank A".into()),
            ..Default::default()
        };
        assert_eq!(state(&config, Dimension::CheckoutLocation, "counter"), ThreeState::Supported);
        assert_eq!(state(&config, Dimension::CheckoutLocation, "kiosk"), ThreeState::Unknown);
        assert_eq!(state(&config, Dimension::AcquiringInstitution, "Bank A"), ThreeState::Supported);
        assert_eq!(state(&config, Dimension::AcquiringInstitution, "Bank B"), ThreeState::Unknown);
    }

    #[test]
    fn test_missing_dimension_is_unknown() {
        let config = ManualConfiguration::default();
        for dimension in Dimension::ALL {
            for value in DimensionCatalog::new().values(dimension) {
                assert_eq!(state(&config, dimension, value.key), ThreeState::Unknown);
            }
        }
    }

    #[test]
    fn test_manual_notes() {
        let catalog = DimensionCatalog::new();
        let config = ManualConfiguration {
            verification_modes: Some(VerificationModes {
                supported: vec!["no_pin".into(), "signature".into()],
                uncertain: vec!["pin".into()],
                no_pin_limit: Some(dec!(100.00)),
                signature_threshold: Some(dec!(5000)),
                ..Default::default()
            }),
            notes: [("verification_mode.pin".to_string(), "asks twice".to_string())].into(),
            ..Default::default()
        };

        assert_eq!(
            manual_note(&config, &catalog, Dimension::VerificationMode, "no_pin").as_deref(),
            Some("min amount without PIN: ¥100")
        );
        assert_eq!(
            manual_note(&config, &catalog, Dimension::VerificationMode, "signature").as_deref(),
            Some("signature required above ¥5000")
        );
        assert_eq!(
            manual_note(&config, &catalog, Dimension::VerificationMode, "pin").as_deref(),
            Some("declared uncertain; asks twice")
        );
        assert_eq!(manual_note(&config, &catalog, Dimension::CardNetwork, "visa"), None);
    }
}
