#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use warden_core::MemorySink;

    fn store() -> warden_config::ConfigStore {
        warden_config::ConfigStore::new(
            warden_config::SafetyConfig::default(),
            Arc::new(MemorySink::new()),
        )
    }

    // ── Mode presets ───────────────────────────────────────────

    mod presets {
        use warden_config::{AutoApprovalThresholds, CommunicationLimits, EmergencyControls};
        use warden_core::{RiskLevel, SafetyMode};

        #[test]
        fn test_approval_thresholds_per_mode() {
            let strict = AutoApprovalThresholds::for_mode(SafetyMode::Strict);
            assert_eq!(strict.max_recipients, 5);
            assert_eq!(strict.min_safety_score, 90);
            assert_eq!(strict.max_risk_level, RiskLevel::Low);
            assert!(strict.require_all_safe_recipients);

            let moderate = AutoApprovalThresholds::for_mode(SafetyMode::Moderate);
            assert_eq!(moderate.max_recipients, 25);
            assert_eq!(moderate.min_safety_score, 75);
            assert_eq!(moderate.max_risk_level, RiskLevel::Medium);

            let relaxed = AutoApprovalThresholds::for_mode(SafetyMode::Relaxed);
            assert_eq!(relaxed.max_recipients, 100);
            assert_eq!(relaxed.min_safety_score, 60);
            assert_eq!(relaxed.max_risk_level, RiskLevel::High);

            let off = AutoApprovalThresholds::for_mode(SafetyMode::Off);
            assert_eq!(off.max_recipients, 1000);
            assert_eq!(off.min_safety_score, 0);
            assert_eq!(off.max_risk_level, RiskLevel::Critical);
        }

        #[test]
        fn test_communication_limits_per_mode() {
            let strict = CommunicationLimits::for_mode(SafetyMode::Strict);
            assert_eq!(strict.max_daily_emails, 1);
            assert_eq!(strict.min_hours_between_contacts, 24);

            let off = CommunicationLimits::for_mode(SafetyMode::Off);
            assert_eq!(off.max_daily_emails, 50);
            assert_eq!(off.min_hours_between_contacts, 0);
        }

        #[test]
        fn test_emergency_controls_tighten_with_mode() {
            let strict = EmergencyControls::for_mode(SafetyMode::Strict);
            assert_eq!(strict.complaint_threshold, 1);
            assert!((strict.failure_rate_threshold - 0.1).abs() < f64::EPSILON);

            let relaxed = EmergencyControls::for_mode(SafetyMode::Relaxed);
            assert_eq!(relaxed.complaint_threshold, 5);
        }
    }

    // ── Atomic mode rewrite ────────────────────────────────────

    mod update_mode {
        use warden_config::{AutoApprovalThresholds, CommunicationLimits, EmergencyControls};
        use warden_core::SafetyMode;

        #[test]
        fn test_rewrites_all_threshold_structures_together() {
            let store = super::store();
            store.update_mode(SafetyMode::Relaxed, "admin");

            let config = store.config();
            assert_eq!(config.mode, SafetyMode::Relaxed);
            assert_eq!(
                config.auto_approval,
                AutoApprovalThresholds::for_mode(SafetyMode::Relaxed)
            );
            assert_eq!(
                config.communication_limits,
                CommunicationLimits::for_mode(SafetyMode::Relaxed)
            );
            assert_eq!(
                config.emergency_controls,
                EmergencyControls::for_mode(SafetyMode::Relaxed)
            );
            assert_eq!(config.modified_by, "admin");
        }

        #[test]
        fn test_off_mode_keeps_absolute_protections() {
            let store = super::store();
            store.update_mode(SafetyMode::Off, "admin");

            let config = store.config();
            assert!(config.lead_protection.respect_do_not_contact);
            assert!(config.lead_protection.protect_existing_tenants);
        }
    }

    // ── Automation gate ────────────────────────────────────────

    mod gate {
        use warden_core::{RiskLevel, SafetyMode};

        #[test]
        fn test_off_mode_allows_everything() {
            let store = super::store();
            store.update_mode(SafetyMode::Off, "admin");
            assert!(store.is_automation_allowed(5000, RiskLevel::Critical, 0));
        }

        #[test]
        fn test_disabled_blocks_everything() {
            let store = super::store();
            store.disable("admin", "incident");
            assert!(!store.is_automation_allowed(1, RiskLevel::Low, 100));

            store.enable("admin");
            assert!(store.is_automation_allowed(1, RiskLevel::Low, 100));
        }

        #[test]
        fn test_recipient_count_ceiling() {
            let store = super::store();
            // Strict allows at most 5 recipients
            assert!(store.is_automation_allowed(5, RiskLevel::Low, 95));
            assert!(!store.is_automation_allowed(6, RiskLevel::Low, 95));
        }

        #[test]
        fn test_safety_score_floor() {
            let store = super::store();
            // Strict requires a score of at least 90
            assert!(store.is_automation_allowed(1, RiskLevel::Low, 90));
            assert!(!store.is_automation_allowed(1, RiskLevel::Low, 89));
        }

        #[test]
        fn test_risk_level_ceiling() {
            let store = super::store();
            assert!(store.is_automation_allowed(1, RiskLevel::Low, 95));
            assert!(!store.is_automation_allowed(1, RiskLevel::Medium, 95));

            store.update_mode(SafetyMode::Moderate, "admin");
            assert!(store.is_automation_allowed(1, RiskLevel::Medium, 95));
            assert!(!store.is_automation_allowed(1, RiskLevel::High, 95));
        }
    }

    // ── Import / export ────────────────────────────────────────

    mod import_export {
        use warden_core::SafetyMode;

        #[test]
        fn test_roundtrip_preserves_mode_and_stamps_metadata() {
            let source = super::store();
            source.update_mode(SafetyMode::Moderate, "admin");
            let doc = source.export_json().unwrap();

            let target = super::store();
            target.import_json(&doc, "importer").unwrap();

            let config = target.config();
            assert_eq!(config.mode, SafetyMode::Moderate);
            assert_eq!(config.modified_by, "importer");
            assert_eq!(config.auto_approval.max_recipients, 25);
        }

        #[test]
        fn test_import_rejects_malformed_document() {
            let store = super::store();
            assert!(store.import_json("{not json", "importer").is_err());
            // A failed import leaves the config untouched
            assert_eq!(store.config().mode, SafetyMode::Strict);
        }
    }

    // ── Stats ──────────────────────────────────────────────────

    mod stats {
        use warden_core::{RiskLevel, SafetyMode};

        #[test]
        fn test_stats_reflect_current_settings() {
            let store = super::store();
            store.update_mode(SafetyMode::Moderate, "ops");

            let stats = store.stats();
            assert_eq!(stats.mode, SafetyMode::Moderate);
            assert!(stats.enabled);
            assert_eq!(stats.max_auto_recipients, 25);
            assert_eq!(stats.min_safety_score, 75);
            assert_eq!(stats.max_risk_level, RiskLevel::Medium);
            assert_eq!(stats.daily_email_limit, 3);
            assert_eq!(stats.modified_by, "ops");
        }
    }

    // ── Loader ─────────────────────────────────────────────────

    mod loader {
        use warden_core::SafetyMode;

        #[test]
        fn test_missing_file_falls_back_to_strict_defaults() {
            let path = std::env::temp_dir().join("warden-test-does-not-exist.json");
            let config = warden_config::load_config(Some(&path)).unwrap();
            assert_eq!(config.mode, SafetyMode::Strict);
            assert!(config.enabled);
        }

        #[test]
        fn test_loads_document_from_disk() {
            let source = super::store();
            source.update_mode(SafetyMode::Relaxed, "admin");
            let doc = source.export_json().unwrap();

            let path = std::env::temp_dir().join(format!(
                "warden-test-config-{}.json",
                std::process::id()
            ));
            std::fs::write(&path, doc).unwrap();

            let config = warden_config::load_config(Some(&path)).unwrap();
            assert_eq!(config.mode, SafetyMode::Relaxed);
            std::fs::remove_file(&path).ok();
        }

        #[test]
        fn test_store_load_wires_defaults() {
            let path = std::env::temp_dir().join("warden-test-store-load-missing.json");
            let store = warden_config::ConfigStore::load(
                Some(&path),
                std::sync::Arc::new(warden_core::MemorySink::new()),
            )
            .unwrap();
            assert_eq!(store.mode(), SafetyMode::Strict);
        }

        #[test]
        fn test_malformed_document_is_a_config_error() {
            let path = std::env::temp_dir().join(format!(
                "warden-test-bad-config-{}.json",
                std::process::id()
            ));
            std::fs::write(&path, "{broken").unwrap();

            let result = warden_config::load_config(Some(&path));
            assert!(matches!(
                result,
                Err(warden_core::WardenError::Config(_))
            ));
            std::fs::remove_file(&path).ok();
        }
    }
}
