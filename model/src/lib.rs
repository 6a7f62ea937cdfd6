//! Modelo del perfil de ejecución de una tarea map.
//!
//! A partir de los contadores acumulados de la tarea y de la metadata de
//! cada spill y cada merge, reconstruye cuánto se combinó en cada etapa.

pub mod attribution;
pub mod conf;
pub mod counters;
pub mod error;
pub mod events;
pub mod phases;
pub mod profile;
pub mod raw;

pub use conf::JobConf;
pub use counters::CumulativeCounters;
pub use error::ProfileError;
pub use events::{CombineEvent, CombineRecords, MergeAction, SpillPiece};
pub use phases::{
    BufferLimits, CombineSummary, DiskCombineFunc, InputSplit, MapFunc, MemCombineFunc,
    SpillBuffer, TaskResources,
};
pub use profile::{TaskProfile, TaskProfileBuilder};
pub use raw::{Input, MapperBuffer, Merge, MergeInfo, Spill, SpillInfo, TaskInfo, TaskReport};
