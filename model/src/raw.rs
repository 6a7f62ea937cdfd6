//! Formas crudas tal como las entrega la capa de recolección.
//!
//! Los nombres de campo van en camelCase para coincidir con el JSON que
//! produce el runtime. Los conteos "after" usan `-1` como "no medido".

use serde::{Deserialize, Serialize};

use crate::conf::JobConf;
use crate::counters::CumulativeCounters;
use crate::events::NOT_MEASURED;

fn not_measured() -> i64 {
    NOT_MEASURED
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInfo {
    /// ej: attempt_201403211644_0002_m_000013_0
    pub task_id: String,
    #[serde(default)]
    pub is_map_running: bool,
    #[serde(default)]
    pub running_phase: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    pub split_bytes: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapperBuffer {
    pub soft_buffer_limit: i64,
    pub kvbuffer_bytes: i64,
    pub soft_record_limit: i64,
    pub kvoffsets_len: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpillInfo {
    pub records_before_combine: i64,
    pub bytes_before_spill: i64,
    #[serde(default = "not_measured")]
    pub records_after_combine: i64,
    #[serde(default = "not_measured")]
    pub bytes_after_spill: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spill {
    /// En orden cronológico (el primero es el más antiguo).
    #[serde(default)]
    pub spill_info_list: Vec<SpillInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeInfo {
    pub partition_id: i32,
    pub segments_num: i32,
    pub records_before_merge: i64,
    pub raw_length_before_merge: i64,
    #[serde(default = "not_measured")]
    pub records_after_merge: i64,
    #[serde(default = "not_measured")]
    pub raw_length_after_merge: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Merge {
    /// En orden cronológico (el primero es el más antiguo).
    #[serde(default)]
    pub merge_info_list: Vec<MergeInfo>,
    /// Si el merge de esta tarea ejecutó el combine en disco.
    #[serde(default)]
    pub has_combine: bool,
}

/// Reporte completo de una tarea map, tal como lo deja el recolector.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskReport {
    pub task: TaskInfo,
    #[serde(default)]
    pub conf: JobConf,
    #[serde(default)]
    pub input: Input,
    #[serde(default)]
    pub buffer: MapperBuffer,
    #[serde(default)]
    pub spill: Spill,
    #[serde(default)]
    pub merge: Merge,
    #[serde(default)]
    pub counters: CumulativeCounters,
}

impl TaskReport {
    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}
