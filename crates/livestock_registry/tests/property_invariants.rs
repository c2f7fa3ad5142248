use livestock_registry::{
    CallContext, LivestockRegistration, LivestockRegistry, Principal, RecordHash,
    RegistryConfig, DEFAULT_BURN_PRINCIPAL,
};
use proptest::prelude::*;
use std::collections::HashSet;

// Random operation sequences against a small registry must never break the
// record/index invariants, whatever mix of successes and rejections occurs.

const OWNERS: [&str; 4] = ["A", "B", "C", DEFAULT_BURN_PRINCIPAL];

#[derive(Debug, Clone)]
enum Op {
    SetAuthority(usize),
    Register {
        hash: u8,
        caller: usize,
        birth_date: u64,
        breed_len: usize,
    },
    UpdateStatus {
        hash: u8,
        caller: usize,
        active: bool,
    },
    Transfer {
        hash: u8,
        caller: usize,
        to: usize,
    },
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..4).prop_map(Op::SetAuthority),
        (0u8..24, 0usize..4, 0u64..=120, 0usize..=52).prop_map(
            |(hash, caller, birth_date, breed_len)| Op::Register {
                hash,
                caller,
                birth_date,
                breed_len,
            }
        ),
        (0u8..24, 0usize..4, any::<bool>()).prop_map(|(hash, caller, active)| {
            Op::UpdateStatus {
                hash,
                caller,
                active,
            }
        }),
        (0u8..24, 0usize..4, 0usize..4).prop_map(|(hash, caller, to)| Op::Transfer {
            hash,
            caller,
            to,
        }),
    ]
}

fn hash(n: u8) -> RecordHash {
    RecordHash::new(format!("hash-{n}"))
}

fn apply(registry: &mut LivestockRegistry, op: &Op) -> bool {
    let ctx = |caller: usize| CallContext::new(OWNERS[caller], 100);
    match op {
        Op::SetAuthority(p) => registry.set_authority(Principal::new(OWNERS[*p])).is_ok(),
        Op::Register {
            hash: h,
            caller,
            birth_date,
            breed_len,
        } => registry
            .register(
                LivestockRegistration::new(
                    hash(*h).as_str(),
                    "x".repeat(*breed_len),
                    *birth_date,
                    "",
                ),
                &ctx(*caller),
            )
            .is_ok(),
        Op::UpdateStatus {
            hash: h,
            caller,
            active,
        } => registry
            .update_status(&hash(*h), *active, &ctx(*caller))
            .is_ok(),
        Op::Transfer { hash: h, caller, to } => registry
            .transfer(&hash(*h), Principal::new(OWNERS[*to]), &ctx(*caller))
            .is_ok(),
    }
}

fn assert_consistent(registry: &LivestockRegistry, config: &RegistryConfig) {
    let snapshot = registry.snapshot();
    assert_eq!(snapshot.count as usize, snapshot.records.len());
    assert!(snapshot.count <= config.max_records);

    let mut seen = HashSet::new();
    for (owner, hashes) in &snapshot.owners {
        assert!(hashes.len() <= config.max_records_per_owner);
        for h in hashes {
            assert!(seen.insert(h.clone()), "{h} indexed twice");
            assert_eq!(&snapshot.records[h].owner, owner);
        }
    }
    assert_eq!(seen.len(), snapshot.records.len());
}

proptest! {
    #[test]
    fn invariants_hold_for_any_operation_sequence(
        ops in prop::collection::vec(arbitrary_op(), 1..120),
    ) {
        let config = RegistryConfig {
            max_records: 16,
            max_records_per_owner: 5,
            ..RegistryConfig::default()
        };
        let mut registry = LivestockRegistry::with_config(config.clone());
        let mut authority_seen: Option<&str> = None;

        for op in &ops {
            let count_before = registry.get_count();
            let ok = apply(&mut registry, op);

            match op {
                Op::Register { .. } if ok => {
                    prop_assert_eq!(registry.get_count(), count_before + 1);
                }
                _ => {
                    prop_assert_eq!(registry.get_count(), count_before);
                }
            }

            if let Op::SetAuthority(p) = op {
                if ok {
                    prop_assert!(authority_seen.is_none());
                    authority_seen = Some(OWNERS[*p]);
                }
            }
            prop_assert_eq!(registry.authority().map(|a| a.as_str()), authority_seen);

            assert_consistent(&registry, &config);
        }
    }
}

proptest! {
    #[test]
    fn rejected_operations_leave_state_unchanged(
        ops in prop::collection::vec(arbitrary_op(), 1..80),
    ) {
        let mut registry = LivestockRegistry::new();
        for op in &ops {
            let before = registry.snapshot();
            if !apply(&mut registry, op) {
                prop_assert_eq!(registry.snapshot(), before);
            }
        }
    }
}
