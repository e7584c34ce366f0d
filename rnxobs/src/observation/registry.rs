//! Declared versus observed observation codes.
use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;

use super::{EpochEntry, ObservationData, Observable, SatId, System};

/// Tracks, per system, the observation codes the header declares and
/// the codes actually observed. Declared order is column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObsTypeRegistry {
    declared: BTreeMap<System, Vec<Observable>>,
    found: BTreeMap<System, BTreeSet<Observable>>,
}

impl ObsTypeRegistry {
    /// Declares the ordered codes of a system, replacing any previous declaration.
    pub fn register_declared(&mut self, system: System, codes: Vec<Observable>) {
        self.declared.insert(system, codes);
    }
    /// Marks `code` as observed for this system. NaN values do not count.
    pub fn observe(&mut self, system: System, code: &Observable, slot: &ObservationData) {
        if slot.value.is_nan() {
            return;
        }
        self.found
            .entry(system)
            .or_default()
            .insert(code.clone());
    }
    /// Marks every slot of this epoch as observed
    pub fn observe_epoch(&mut self, entry: &EpochEntry) {
        for sat in entry.satellites.iter() {
            for (code, slot) in sat.observations.iter() {
                self.observe(sat.sv.system, code, slot);
            }
        }
    }
    /// Removes declared codes never observed, preserving the order of the others.
    /// Returns what was removed, per system. A second call removes nothing.
    pub fn prune_unused(&mut self) -> BTreeMap<System, Vec<Observable>> {
        let mut removed = BTreeMap::<System, Vec<Observable>>::new();
        for (system, codes) in self.declared.iter_mut() {
            let found = self.found.get(system);
            let (kept, dropped): (Vec<_>, Vec<_>) = codes
                .drain(..)
                .partition(|code| found.map(|f| f.contains(code)).unwrap_or(false));
            *codes = kept;
            if !dropped.is_empty() {
                removed.insert(*system, dropped);
            }
        }
        removed
    }
    /// Declared codes of a system
    pub fn declared(&self, system: &System) -> Option<&[Observable]> {
        self.declared.get(system).map(|codes| codes.as_slice())
    }
    /// Declared codes for this satellite
    pub fn codes_for(&self, sv: &SatId) -> Option<&[Observable]> {
        self.declared(&sv.system)
    }
    /// Observed codes of a system
    pub fn found(&self, system: &System) -> Option<&BTreeSet<Observable>> {
        self.found.get(system)
    }
    /// Systems that declare at least one code, in output order
    pub fn systems(&self) -> Vec<System> {
        self.declared
            .iter()
            .filter(|(_, codes)| !codes.is_empty())
            .map(|(system, _)| *system)
            .sorted_by_key(|system| system.rank())
            .collect()
    }
    /// Union of all declared codes, first occurrence order.
    /// This is the single RINEX2 code list.
    pub fn flattened(&self) -> Vec<Observable> {
        self.systems()
            .iter()
            .filter_map(|system| self.declared.get(system))
            .flatten()
            .unique()
            .cloned()
            .collect()
    }
    /// True when no system declares any code
    pub fn is_empty(&self) -> bool {
        self.declared.values().all(|codes| codes.is_empty())
    }
    /// Systems whose declared list was emptied
    pub fn emptied_systems(&self) -> Vec<System> {
        self.declared
            .iter()
            .filter(|(_, codes)| codes.is_empty())
            .map(|(system, _)| *system)
            .collect()
    }
    /// Forgets every observation, declarations remain
    pub(crate) fn reset_found(&mut self) {
        self.found.clear();
    }
    /// Retains the declared codes matching the predicate
    pub(crate) fn retain_declared<F>(&mut self, f: F)
    where
        F: Fn(&System, &Observable) -> bool,
    {
        for (system, codes) in self.declared.iter_mut() {
            codes.retain(|code| f(system, code));
        }
    }
}

#[cfg(test)]
mod test {
    use super::ObsTypeRegistry;
    use crate::observation::{ObservationData, Observable, System};
    use std::str::FromStr;
    fn codes(descs: &[&str]) -> Vec<Observable> {
        descs
            .iter()
            .map(|d| Observable::from_str(d).unwrap())
            .collect()
    }
    #[test]
    fn prune_unused_codes() {
        let mut registry = ObsTypeRegistry::default();
        registry.register_declared(System::GPS, codes(&["C1C", "L1C", "S1C", "C2W"]));
        registry.register_declared(System::GLONASS, codes(&["C1C", "L1C"]));
        registry.register_declared(System::GALILEO, codes(&["C1X"]));

        let slot = ObservationData::new(1.0, None, None);
        for code in codes(&["L1C", "C1C"]) {
            registry.observe(System::GPS, &code, &slot);
        }
        registry.observe(System::GLONASS, &codes(&["L1C"])[0], &slot);

        let nan = ObservationData::new(f64::NAN, None, None);
        registry.observe(System::GLONASS, &codes(&["C1C"])[0], &nan);

        let removed = registry.prune_unused();
        assert_eq!(removed.get(&System::GPS), Some(&codes(&["S1C", "C2W"])));
        assert_eq!(removed.get(&System::GLONASS), Some(&codes(&["C1C"])));
        assert_eq!(removed.get(&System::GALILEO), Some(&codes(&["C1X"])));

        assert_eq!(
            registry.declared(&System::GPS),
            Some(codes(&["C1C", "L1C"]).as_slice())
        );
        assert_eq!(registry.emptied_systems(), vec![System::GALILEO]);
        assert_eq!(registry.systems(), vec![System::GPS, System::GLONASS]);

        let state = registry.clone();
        assert!(registry.prune_unused().is_empty(), "pruning is not idempotent");
        assert_eq!(registry, state);
    }
    #[test]
    fn found_is_subset_of_declared() {
        let mut registry = ObsTypeRegistry::default();
        registry.register_declared(System::GPS, codes(&["C1", "L1", "L2", "P2"]));
        let slot = ObservationData::new(1.0, None, None);
        for code in codes(&["L1", "P2"]) {
            registry.observe(System::GPS, &code, &slot);
        }
        registry.prune_unused();
        let declared = registry.declared(&System::GPS).unwrap();
        for code in registry.found(&System::GPS).unwrap() {
            assert!(declared.contains(code));
        }
        assert_eq!(declared, codes(&["L1", "P2"]).as_slice());
    }
    #[test]
    fn flattened_codes() {
        let mut registry = ObsTypeRegistry::default();
        for system in [System::GPS, System::GLONASS, System::SBAS] {
            registry.register_declared(system, codes(&["C1", "L1", "L2"]));
        }
        assert_eq!(registry.flattened(), codes(&["C1", "L1", "L2"]));
        assert!(!registry.is_empty());
        assert!(ObsTypeRegistry::default().is_empty());
    }
}
