use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Sub};

use crate::raw::{MergeInfo, SpillInfo};

/// Valor que el runtime usa para "no medido" en los conteos posteriores al combine.
pub const NOT_MEASURED: i64 = -1;

/// Convierte un valor crudo del runtime a `Option`:
/// `-1` significa que el runtime no midió ese valor para el evento.
pub fn measured(raw: i64) -> Option<i64> {
    if raw == NOT_MEASURED {
        None
    } else {
        Some(raw)
    }
}

/// Par de registros (entrada, salida) de un paso de combine.
/// Las operaciones dan la vuelta en overflow, como el `long` del runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombineRecords {
    pub input: i64,
    pub output: i64,
}

impl CombineRecords {
    pub const ZERO: CombineRecords = CombineRecords { input: 0, output: 0 };

    pub fn new(input: i64, output: i64) -> Self {
        Self { input, output }
    }
}

impl Add for CombineRecords {
    type Output = CombineRecords;

    fn add(self, rhs: Self) -> Self::Output {
        CombineRecords {
            input: self.input.wrapping_add(rhs.input),
            output: self.output.wrapping_add(rhs.output),
        }
    }
}

impl AddAssign for CombineRecords {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for CombineRecords {
    type Output = CombineRecords;

    fn sub(self, rhs: Self) -> Self::Output {
        CombineRecords {
            input: self.input.wrapping_sub(rhs.input),
            output: self.output.wrapping_sub(rhs.output),
        }
    }
}

/// Un evento (spill o merge) que consume y produce registros.
pub trait CombineEvent {
    fn records_before(&self) -> i64;

    /// `None` cuando el runtime no lo midió.
    fn records_after(&self) -> Option<i64>;

    /// Aporte del evento a las sumas acumuladas: un "after" no medido cuenta 0.
    fn contribution(&self) -> CombineRecords {
        CombineRecords::new(self.records_before(), self.records_after().unwrap_or(0))
    }

    /// Par medido directamente por el runtime, si existe.
    fn measured_pair(&self) -> Option<CombineRecords> {
        self.records_after()
            .map(|after| CombineRecords::new(self.records_before(), after))
    }
}

/* --------- Spills --------- */

/// Un spill del buffer de ordenamiento a disco (cubre todas las particiones).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpillPiece {
    pub records_before: i64,
    pub bytes_before: i64,
    pub records_after: Option<i64>,
    pub bytes_after: Option<i64>,
}

impl From<&SpillInfo> for SpillPiece {
    fn from(info: &SpillInfo) -> Self {
        Self {
            records_before: info.records_before_combine,
            bytes_before: info.bytes_before_spill,
            records_after: measured(info.records_after_combine),
            bytes_after: measured(info.bytes_after_spill),
        }
    }
}

impl CombineEvent for SpillPiece {
    fn records_before(&self) -> i64 {
        self.records_before
    }

    fn records_after(&self) -> Option<i64> {
        self.records_after
    }
}

/* --------- Merges --------- */

/// Un merge de segmentos de una partición.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeAction {
    pub partition_id: i32,
    pub segments: i32,
    pub records_before: i64,
    pub bytes_before: i64,
    pub records_after: Option<i64>,
    pub bytes_after: Option<i64>,
}

impl From<&MergeInfo> for MergeAction {
    fn from(info: &MergeInfo) -> Self {
        Self {
            partition_id: info.partition_id,
            segments: info.segments_num,
            records_before: info.records_before_merge,
            bytes_before: info.raw_length_before_merge,
            records_after: measured(info.records_after_merge),
            bytes_after: measured(info.raw_length_after_merge),
        }
    }
}

impl CombineEvent for MergeAction {
    fn records_before(&self) -> i64 {
        self.records_before
    }

    fn records_after(&self) -> Option<i64> {
        self.records_after
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measured_trata_menos_uno_como_ausente() {
        assert_eq!(measured(-1), None);
        assert_eq!(measured(0), Some(0));
        assert_eq!(measured(42), Some(42));
        // sólo -1 es el centinela, otros negativos pasan tal cual
        assert_eq!(measured(-7), Some(-7));
    }

    #[test]
    fn spill_piece_desde_info_conserva_campos() {
        let info = SpillInfo {
            records_before_combine: 1000,
            bytes_before_spill: 64_000,
            records_after_combine: -1,
            bytes_after_spill: 30_000,
        };

        let piece = SpillPiece::from(&info);

        assert_eq!(piece.records_before, 1000);
        assert_eq!(piece.bytes_before, 64_000);
        assert_eq!(piece.records_after, None);
        assert_eq!(piece.bytes_after, Some(30_000));
    }

    #[test]
    fn merge_action_desde_info_conserva_particion_y_segmentos() {
        let info = MergeInfo {
            partition_id: 3,
            segments_num: 5,
            records_before_merge: 800,
            raw_length_before_merge: 9_000,
            records_after_merge: 200,
            raw_length_after_merge: 2_500,
        };

        let action = MergeAction::from(&info);

        assert_eq!(action.partition_id, 3);
        assert_eq!(action.segments, 5);
        assert_eq!(action.records_before, 800);
        assert_eq!(action.records_after, Some(200));
        assert_eq!(action.bytes_after, Some(2_500));
    }

    #[test]
    fn contribution_usa_cero_si_no_hay_medicion() {
        let piece = SpillPiece {
            records_before: 600,
            bytes_before: 0,
            records_after: None,
            bytes_after: None,
        };

        assert_eq!(piece.contribution(), CombineRecords::new(600, 0));
        assert_eq!(piece.measured_pair(), None);
    }

    #[test]
    fn combine_records_suma_y_resta() {
        let a = CombineRecords::new(10, 4);
        let b = CombineRecords::new(3, 1);

        assert_eq!(a + b, CombineRecords::new(13, 5));
        assert_eq!(a - b, CombineRecords::new(7, 3));

        let mut acc = CombineRecords::ZERO;
        acc += a;
        acc += b;
        assert_eq!(acc, CombineRecords::new(13, 5));
    }

    #[test]
    fn combine_records_da_la_vuelta_en_extremos() {
        let min = CombineRecords::new(i64::MIN, i64::MIN);
        let max = CombineRecords::new(i64::MAX, i64::MAX);
        let one = CombineRecords::new(1, 1);

        assert_eq!(min - one, max);
        assert_eq!(max + one, min);

        let mut acc = max;
        acc += one;
        assert_eq!(acc, min);
    }
}
