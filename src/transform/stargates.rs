use std::collections::HashMap;

use super::model::Stargate;

/// Resolve each stargate's destination stargate to the system that owns it.
///
/// Builds a stargate id -> owning system id map over every stargate of the
/// run, then looks up each destination. Stargates whose destination was not
/// observed (e.g. it lies outside this export) are dropped, so every returned
/// row has `destination_system_id` set. Input order is preserved.
pub fn resolve_stargates(raw: &[Stargate]) -> Vec<Stargate> {
    let owners: HashMap<i64, i64> = raw
        .iter()
        .map(|sg| (sg.stargate_id, sg.system_id))
        .collect();

    raw.iter()
        .filter_map(|sg| {
            owners
                .get(&sg.destination_stargate_id)
                .map(|&destination_system_id| Stargate {
                    destination_system_id: Some(destination_system_id),
                    ..sg.clone()
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(stargate_id: i64, system_id: i64, destination: i64) -> Stargate {
        Stargate {
            stargate_id,
            stargate_name: format!("Stargate to {}", destination),
            system_id,
            destination_stargate_id: destination,
            destination_system_id: None,
        }
    }

    #[test]
    fn test_paired_gates_resolve_to_each_other() {
        let raw = vec![gate(50001, 30001, 50002), gate(50002, 30002, 50001)];
        let resolved = resolve_stargates(&raw);

        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].stargate_id, 50001);
        assert_eq!(resolved[0].destination_system_id, Some(30002));
        assert_eq!(resolved[1].stargate_id, 50002);
        assert_eq!(resolved[1].destination_system_id, Some(30001));
    }

    #[test]
    fn test_unpaired_gate_dropped() {
        let raw = vec![
            gate(50001, 30001, 50002),
            gate(50002, 30002, 50001),
            gate(50003, 30002, 59999),
        ];
        let resolved = resolve_stargates(&raw);

        assert_eq!(resolved.len(), 2);
        assert!(resolved.iter().all(|sg| sg.stargate_id != 50003));
        assert!(resolved.iter().all(|sg| sg.destination_system_id.is_some()));
    }

    #[test]
    fn test_one_way_link_still_resolves() {
        // Only the gate whose destination was observed resolves
        let raw = vec![gate(50001, 30001, 50002), gate(50002, 30002, 58888)];
        let resolved = resolve_stargates(&raw);

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].stargate_id, 50001);
        assert_eq!(resolved[0].destination_system_id, Some(30002));
    }

    #[test]
    fn test_empty_input() {
        assert!(resolve_stargates(&[]).is_empty());
    }
}
