#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use warden_config::{ConfigStore, SafetyConfig};
    use warden_core::{MemorySink, WardenError};
    use warden_governor::ModeGovernor;
    use warden_override::{
        NoopControl, OverrideController, OverridePatch, OverrideRequest, OverrideScope,
        OverrideType,
    };

    fn controller() -> OverrideController {
        let store = ConfigStore::new(SafetyConfig::default(), Arc::new(MemorySink::new()));
        let governor = Arc::new(ModeGovernor::new(store.clone(), Arc::new(MemorySink::new())));
        OverrideController::new(store, governor, Arc::new(NoopControl), Arc::new(MemorySink::new()))
    }

    fn request(requested_by: &str) -> OverrideRequest {
        OverrideRequest {
            kind: OverrideType::Temporary,
            reason: "campaign launch window".into(),
            requested_by: requested_by.into(),
            duration_hours: 24,
            scope: OverrideScope::Global,
            target_id: None,
            settings: OverridePatch {
                max_recipients: Some(50),
                ..OverridePatch::default()
            },
        }
    }

    // ── Request validation ─────────────────────────────────────

    mod validation {
        use super::*;

        #[test]
        fn test_duration_over_one_week_fails() {
            let controller = controller();
            let result = controller.request_override(OverrideRequest {
                duration_hours: 200,
                ..request("admin")
            });
            assert!(matches!(
                result,
                Err(WardenError::Validation { ref field, .. }) if field == "duration_hours"
            ));
        }

        #[test]
        fn test_zero_duration_fails() {
            let controller = controller();
            let result = controller.request_override(OverrideRequest {
                duration_hours: 0,
                ..request("admin")
            });
            assert!(matches!(result, Err(WardenError::Validation { .. })));
        }

        #[test]
        fn test_empty_reason_fails() {
            let controller = controller();
            let result = controller.request_override(OverrideRequest {
                reason: String::new(),
                ..request("admin")
            });
            assert!(matches!(
                result,
                Err(WardenError::Validation { ref field, .. }) if field == "reason"
            ));
        }

        #[test]
        fn test_scoped_without_target_fails() {
            let controller = controller();
            for scope in [OverrideScope::Campaign, OverrideScope::Lead] {
                let result = controller.request_override(OverrideRequest {
                    scope,
                    target_id: None,
                    ..request("admin")
                });
                assert!(matches!(
                    result,
                    Err(WardenError::Validation { ref field, .. }) if field == "target_id"
                ));
            }
        }
    }

    // ── Authorization ──────────────────────────────────────────

    mod authorization {
        use super::*;

        #[test]
        fn test_unknown_requester_fails() {
            let controller = controller();
            let result = controller.request_override(request("rando"));
            assert!(matches!(result, Err(WardenError::Authorization { .. })));
        }

        #[test]
        fn test_admin_always_allowed() {
            let controller = controller();
            let override_ = controller.request_override(request("admin")).unwrap();
            assert!(override_.active);
            assert_eq!(override_.usage_count, 0);
        }

        #[test]
        fn test_emergency_system_only_for_emergency_type() {
            let controller = controller();
            let result = controller.request_override(request("emergency-system"));
            assert!(matches!(result, Err(WardenError::Authorization { .. })));

            let override_ = controller
                .request_override(OverrideRequest {
                    kind: OverrideType::Emergency,
                    ..request("emergency-system")
                })
                .unwrap();
            assert_eq!(override_.kind, OverrideType::Emergency);
        }

        #[test]
        fn test_allow_listed_user_allowed() {
            // Default config allow-lists "admin" only; add another via import
            let store = ConfigStore::new(SafetyConfig::default(), Arc::new(MemorySink::new()));
            let mut config = store.config();
            config
                .override_settings
                .authorized_override_users
                .push("ops-oncall".into());
            let doc = serde_json::to_string(&config).unwrap();
            store.import_json(&doc, "test").unwrap();

            let governor = Arc::new(ModeGovernor::new(store.clone(), Arc::new(MemorySink::new())));
            let controller = OverrideController::new(
                store,
                governor,
                Arc::new(NoopControl),
                Arc::new(MemorySink::new()),
            );
            assert!(controller.request_override(request("ops-oncall")).is_ok());
        }
    }

    // ── Apply / expire / revoke ────────────────────────────────

    mod lifecycle {
        use super::*;
        use chrono::{Duration, Utc};

        #[test]
        fn test_global_override_patches_live_thresholds() {
            let controller = controller();
            let before = controller.effective_settings(OverrideScope::Global, None);
            assert_eq!(before.auto_approval.max_recipients, 5);

            let override_ = controller.request_override(request("admin")).unwrap();
            assert_eq!(override_.original_settings, before);

            let after = controller.effective_settings(OverrideScope::Global, None);
            assert_eq!(after.auto_approval.max_recipients, 50);
        }

        #[test]
        fn test_expiry_restores_snapshot_exactly() {
            let controller = controller();
            let before = controller.effective_settings(OverrideScope::Global, None);
            let override_ = controller.request_override(request("admin")).unwrap();

            // Not yet expired
            assert_eq!(controller.expire_overrides_at(Utc::now()), 0);

            let expired = controller.expire_overrides_at(Utc::now() + Duration::hours(48));
            assert_eq!(expired, 1);

            let restored = controller.effective_settings(OverrideScope::Global, None);
            assert_eq!(restored, before);

            // Deactivated, not deleted
            let stored = controller.get_override(override_.id).unwrap();
            assert!(!stored.active);
            assert!(controller.active_overrides().is_empty());
        }

        #[test]
        fn test_scoped_override_overlays_one_target_only() {
            let controller = controller();
            let override_ = controller
                .request_override(OverrideRequest {
                    scope: OverrideScope::Lead,
                    target_id: Some("lead-42".into()),
                    ..request("admin")
                })
                .unwrap();

            let scoped = controller.effective_settings(OverrideScope::Lead, Some("lead-42"));
            assert_eq!(scoped.auto_approval.max_recipients, 50);

            // Other targets and the global config are untouched
            let other = controller.effective_settings(OverrideScope::Lead, Some("lead-7"));
            assert_eq!(other.auto_approval.max_recipients, 5);
            let global = controller.effective_settings(OverrideScope::Global, None);
            assert_eq!(global.auto_approval.max_recipients, 5);

            controller
                .revoke_override(override_.id, "admin", "done")
                .unwrap();
            let reverted = controller.effective_settings(OverrideScope::Lead, Some("lead-42"));
            assert_eq!(reverted.auto_approval.max_recipients, 5);
        }

        #[test]
        fn test_revoke_authorization() {
            let controller = controller();
            let override_ = controller.request_override(request("admin")).unwrap();

            let result = controller.revoke_override(override_.id, "rando", "nope");
            assert!(matches!(result, Err(WardenError::Authorization { .. })));
            assert!(controller.get_override(override_.id).unwrap().active);

            controller
                .revoke_override(override_.id, "admin", "rolled back")
                .unwrap();
            assert!(!controller.get_override(override_.id).unwrap().active);
        }

        #[test]
        fn test_revoke_unknown_id_fails() {
            let controller = controller();
            let result = controller.revoke_override(uuid::Uuid::new_v4(), "admin", "x");
            assert!(matches!(result, Err(WardenError::OverrideNotFound(_))));
        }

        #[test]
        fn test_revoke_inactive_is_a_state_error() {
            let controller = controller();
            let override_ = controller.request_override(request("admin")).unwrap();
            controller
                .revoke_override(override_.id, "admin", "first")
                .unwrap();

            let result = controller.revoke_override(override_.id, "admin", "again");
            assert!(matches!(result, Err(WardenError::State(_))));
        }

        #[test]
        fn test_record_use_counts() {
            let controller = controller();
            let override_ = controller.request_override(request("admin")).unwrap();
            controller.record_use(override_.id).unwrap();
            controller.record_use(override_.id).unwrap();

            let stored = controller.get_override(override_.id).unwrap();
            assert_eq!(stored.usage_count, 2);
            assert!(stored.last_used.is_some());
        }

        #[test]
        fn test_stats() {
            let controller = controller();
            controller.request_override(request("admin")).unwrap();
            let second = controller.request_override(request("admin")).unwrap();
            controller
                .revoke_override(second.id, "admin", "done")
                .unwrap();

            let stats = controller.override_stats();
            assert_eq!(stats.active_overrides, 1);
            assert_eq!(stats.total_overrides, 2);
            assert!(!stats.emergency_active);
        }
    }

    // ── Sink re-entrancy ───────────────────────────────────────

    mod reentrancy {
        use super::*;
        use chrono::{Duration, Utc};
        use std::sync::OnceLock;
        use std::sync::atomic::{AtomicUsize, Ordering};
        use warden_core::{AuditEvent, AuditSink};
        use warden_override::EmergencyLevel;

        /// A host sink that reads controller state back on every event, the
        /// way a dashboard exporter would.
        #[derive(Default)]
        struct ReadbackSink {
            controller: OnceLock<Arc<OverrideController>>,
            recorded: AtomicUsize,
        }

        impl AuditSink for ReadbackSink {
            fn record(&self, _event: AuditEvent) {
                if let Some(controller) = self.controller.get() {
                    let _ = controller.active_overrides();
                    let _ = controller.emergency_state();
                    let _ = controller.override_stats();
                }
                self.recorded.fetch_add(1, Ordering::SeqCst);
            }
        }

        #[test]
        fn test_sink_may_read_controller_state_back() {
            let sink = Arc::new(ReadbackSink::default());
            let store = ConfigStore::new(SafetyConfig::default(), Arc::new(MemorySink::new()));
            let governor =
                Arc::new(ModeGovernor::new(store.clone(), Arc::new(MemorySink::new())));
            let controller = Arc::new(OverrideController::new(
                store,
                governor,
                Arc::new(NoopControl),
                sink.clone(),
            ));
            let _ = sink.controller.set(Arc::clone(&controller));

            // Every lifecycle step that emits an audit event must complete
            // even though the sink re-enters the controller.
            controller.request_override(request("admin")).unwrap();
            assert_eq!(controller.expire_overrides_at(Utc::now() + Duration::hours(48)), 1);

            let revocable = controller.request_override(request("admin")).unwrap();
            controller
                .revoke_override(revocable.id, "admin", "done")
                .unwrap();

            controller.activate_emergency_stop("oncall", "incident", EmergencyLevel::Medium);
            controller
                .deactivate_emergency_stop("oncall", "resolved")
                .unwrap();

            assert_eq!(sink.recorded.load(Ordering::SeqCst), 6);
        }
    }

    // ── Emergency stop ─────────────────────────────────────────

    mod emergency {
        use super::*;
        use warden_core::SafetyMode;
        use warden_override::EmergencyLevel;

        fn controller_at_relaxed() -> (OverrideController, ConfigStore) {
            let mut config = SafetyConfig::default();
            config.apply_mode(SafetyMode::Relaxed, "test");
            let store = ConfigStore::new(config, Arc::new(MemorySink::new()));
            let governor = Arc::new(ModeGovernor::new(store.clone(), Arc::new(MemorySink::new())));
            let controller = OverrideController::new(
                store.clone(),
                governor,
                Arc::new(NoopControl),
                Arc::new(MemorySink::new()),
            );
            (controller, store)
        }

        #[test]
        fn test_critical_stops_automation_and_forces_strict() {
            let (controller, store) = controller_at_relaxed();
            controller.activate_emergency_stop("oncall", "complaint storm", EmergencyLevel::Critical);

            let state = controller.emergency_state();
            assert!(state.active);
            assert!(state.automation_stopped);
            assert_eq!(state.level, EmergencyLevel::Critical);
            assert_eq!(state.activated_by, "oncall");
            assert_eq!(state.resolution_steps.len(), 5);
            assert_eq!(store.mode(), SafetyMode::Strict);
        }

        #[test]
        fn test_high_stops_campaigns_but_keeps_mode() {
            let (controller, store) = controller_at_relaxed();
            controller.activate_emergency_stop("oncall", "delivery failures", EmergencyLevel::High);

            let state = controller.emergency_state();
            assert!(state.automation_stopped);
            assert_eq!(store.mode(), SafetyMode::Relaxed);
        }

        #[test]
        fn test_medium_forces_strict_without_stopping() {
            let (controller, store) = controller_at_relaxed();
            controller.activate_emergency_stop("oncall", "threshold breach", EmergencyLevel::Medium);

            let state = controller.emergency_state();
            assert!(!state.automation_stopped);
            assert_eq!(store.mode(), SafetyMode::Strict);
        }

        #[test]
        fn test_low_flags_checks_only() {
            let (controller, store) = controller_at_relaxed();
            controller.activate_emergency_stop("oncall", "anomaly", EmergencyLevel::Low);

            let state = controller.emergency_state();
            assert!(state.active);
            assert!(!state.automation_stopped);
            assert_eq!(store.mode(), SafetyMode::Relaxed);
            assert_eq!(state.resolution_steps.len(), 3);
        }

        #[test]
        fn test_reactivation_supersedes_prior_state() {
            let (controller, _) = controller_at_relaxed();
            controller.activate_emergency_stop("oncall", "first", EmergencyLevel::Low);
            controller.activate_emergency_stop("admin", "worse", EmergencyLevel::Critical);

            let state = controller.emergency_state();
            assert_eq!(state.level, EmergencyLevel::Critical);
            assert_eq!(state.activated_by, "admin");
            assert_eq!(state.reason, "worse");
        }

        #[test]
        fn test_deactivate_clears_active() {
            let (controller, _) = controller_at_relaxed();
            controller.activate_emergency_stop("oncall", "incident", EmergencyLevel::High);
            controller
                .deactivate_emergency_stop("oncall", "resolved")
                .unwrap();
            assert!(!controller.emergency_state().active);
        }

        #[test]
        fn test_deactivate_without_active_emergency_fails() {
            let (controller, _) = controller_at_relaxed();
            let result = controller.deactivate_emergency_stop("oncall", "nothing");
            assert!(matches!(result, Err(WardenError::State(_))));
        }

        #[test]
        fn test_failed_hook_does_not_block_activation() {
            struct FailingControl;
            impl warden_override::AutomationControl for FailingControl {
                fn stop_all_automation(&self) -> warden_core::Result<()> {
                    Err(WardenError::State("dispatcher unreachable".into()))
                }
                fn stop_automated_campaigns(&self) -> warden_core::Result<()> {
                    Err(WardenError::State("dispatcher unreachable".into()))
                }
                fn enable_additional_checks(&self) -> warden_core::Result<()> {
                    Ok(())
                }
                fn restore_normal_operations(&self) -> warden_core::Result<()> {
                    Ok(())
                }
            }

            let store = ConfigStore::new(SafetyConfig::default(), Arc::new(MemorySink::new()));
            let governor = Arc::new(ModeGovernor::new(store.clone(), Arc::new(MemorySink::new())));
            let controller = OverrideController::new(
                store,
                governor,
                Arc::new(FailingControl),
                Arc::new(MemorySink::new()),
            );

            // Fail-open on the declaration, fail-soft on the side effects
            controller.activate_emergency_stop("oncall", "incident", EmergencyLevel::Critical);
            assert!(controller.emergency_state().active);
        }
    }
}
