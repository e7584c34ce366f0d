//! Filter implementations: masks and resampling, applied to epochs,
//! records and whole files.
use rnxobs_qc_traits::{
    Filter, MaskFilter, MaskOperand, MaskToken, Masking, Preprocessing, Resampling,
    ResamplingFilter, ResamplingOps,
};

use crate::{
    header::Header,
    observation::{EpochEntry, Record, SatId, System},
    prelude::Constellation,
    reader::{resampled_interval, update_time_frame},
    Rinex,
};

/// Compares `sat` against the first PRN of the same system in `svs`.
/// Vehicles of other systems always pass.
fn compare_prn(operand: MaskOperand, sat: &SatId, svs: &[SatId]) -> bool {
    match svs.iter().find(|sv| sv.system == sat.system) {
        Some(reference) => operand.compare(&sat.prn, &reference.prn),
        None => true,
    }
}

fn sv_mask(operand: MaskOperand, sat: &SatId, svs: &[SatId]) -> bool {
    match operand {
        MaskOperand::Equals => svs.contains(sat),
        MaskOperand::NotEquals => !svs.contains(sat),
        _ => compare_prn(operand, sat, svs),
    }
}

/// True when `system` is one of the `constellations`.
/// Any SBAS service designates every SBAS vehicle.
fn listed_system(system: &System, constellations: &[Constellation]) -> bool {
    constellations.iter().any(|c| System::from(*c) == *system)
}

fn constellation_mask(
    operand: MaskOperand,
    sat: &SatId,
    constellations: &[Constellation],
) -> bool {
    let contained = listed_system(&sat.system, constellations);
    match operand {
        MaskOperand::Equals => contained,
        MaskOperand::NotEquals => !contained,
        // does not apply
        _ => true,
    }
}

/// Applies code and system masks to the declared codes,
/// so the header does not declare what was masked out.
/// Returns true when the declarations changed.
pub(crate) fn mask_declared(header: &mut Header, mask: &MaskFilter) -> bool {
    let before = header.obs.clone();
    match &mask.token {
        MaskToken::Observables(codes) => header.obs.retain_declared(|_, code| {
            let listed = codes.iter().any(|c| c == code.as_str());
            match mask.operand {
                MaskOperand::Equals => listed,
                MaskOperand::NotEquals => !listed,
                _ => true,
            }
        }),
        MaskToken::Constellations(constellations) => {
            header.obs.retain_declared(|system, _| {
                let contained = listed_system(system, constellations);
                match mask.operand {
                    MaskOperand::Equals => contained,
                    MaskOperand::NotEquals => !contained,
                    _ => true,
                }
            })
        },
        _ => {},
    }
    header.obs != before
}

impl Masking for EpochEntry {
    fn mask(&self, mask: &MaskFilter) -> Self {
        let mut s = self.clone();
        s.mask_mut(mask);
        s
    }
    /// Satellite level masking. Satellites left without observation
    /// are removed, the epoch itself always remains. Epoch masks
    /// do not apply here: see [Record].
    fn mask_mut(&mut self, mask: &MaskFilter) {
        let before = (self.num_sat(), self.num_observations());
        match &mask.token {
            MaskToken::Epoch(_) => {},
            MaskToken::SV(svs) => {
                let svs = svs.iter().map(|sv| SatId::from(*sv)).collect::<Vec<_>>();
                self.satellites
                    .retain(|sat| sv_mask(mask.operand, &sat.sv, &svs));
            },
            MaskToken::Constellations(constellations) => {
                self.satellites
                    .retain(|sat| constellation_mask(mask.operand, &sat.sv, constellations));
            },
            MaskToken::Observables(codes) => {
                for sat in self.satellites.iter_mut() {
                    sat.observations.retain(|code, _| {
                        let listed = codes.iter().any(|c| c == code.as_str());
                        match mask.operand {
                            MaskOperand::Equals => listed,
                            MaskOperand::NotEquals => !listed,
                            _ => true,
                        }
                    });
                }
                self.satellites.retain(|sat| !sat.observations.is_empty());
            },
        }
        if (self.num_sat(), self.num_observations()) != before {
            self.raw = None;
        }
    }
}

impl Masking for Record {
    fn mask(&self, mask: &MaskFilter) -> Self {
        let mut s = self.clone();
        s.mask_mut(mask);
        s
    }
    fn mask_mut(&mut self, mask: &MaskFilter) {
        match &mask.token {
            MaskToken::Epoch(t) => self.retain(|entry| mask.operand.compare(&entry.epoch, t)),
            _ => {
                for entry in self.iter_mut() {
                    entry.mask_mut(mask);
                }
            },
        }
    }
}

impl Resampling for Record {
    fn resample(&self, resamp: &ResamplingFilter) -> Self {
        let mut s = self.clone();
        s.resample_mut(resamp);
        s
    }
    /// Decimation: epochs are counted in order of appearance.
    /// With a mask, only the epochs it selects are subject to
    /// decimation, the others are always retained.
    fn resample_mut(&mut self, resamp: &ResamplingFilter) {
        let ResamplingOps::Decimation(decim) = &resamp.ops;
        let mut index = 0;
        self.retain(|entry| {
            let subject = match &resamp.mask {
                Some(mask) => match &mask.token {
                    MaskToken::Epoch(t) => mask.operand.compare(&entry.epoch, t),
                    _ => entry.mask(mask).num_observations() > 0,
                },
                None => true,
            };
            if !subject {
                return true;
            }
            let retained = decim.retains(index, entry.epoch);
            index += 1;
            retained
        });
    }
}

impl Preprocessing for Record {
    fn filter(&self, f: &Filter) -> Self {
        let mut s = self.clone();
        s.filter_mut(f);
        s
    }
}

impl Masking for Rinex {
    fn mask(&self, mask: &MaskFilter) -> Self {
        let mut s = self.clone();
        s.mask_mut(mask);
        s
    }
    /// Masks the record, then updates the header accordingly.
    fn mask_mut(&mut self, mask: &MaskFilter) {
        self.record.mask_mut(mask);
        if mask_declared(&mut self.header, mask) {
            self.record.clear_raw();
        }
        update_time_frame(&mut self.header, &self.record, None);
    }
}

impl Resampling for Rinex {
    fn resample(&self, resamp: &ResamplingFilter) -> Self {
        let mut s = self.clone();
        s.resample_mut(resamp);
        s
    }
    fn resample_mut(&mut self, resamp: &ResamplingFilter) {
        self.record.resample_mut(resamp);
        let sampling = resampled_interval(resamp, &self.record);
        update_time_frame(&mut self.header, &self.record, sampling);
    }
}

impl Preprocessing for Rinex {
    fn filter(&self, f: &Filter) -> Self {
        let mut s = self.clone();
        s.filter_mut(f);
        s
    }
}
