use serde::{Deserialize, Serialize};

use crate::events::CombineRecords;

/// Contadores acumulados de toda la tarea, reportados al terminar.
/// Se toman como verdad: lo atribuido a cada evento tiene que sumar esto.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CumulativeCounters {
    pub hdfs_bytes_read: i64,
    pub hdfs_bytes_written: i64,
    pub file_bytes_read: i64,
    pub file_bytes_written: i64,

    pub map_input_records: i64,
    pub map_output_records: i64,
    pub map_output_bytes: i64,

    pub combine_input_records: i64,
    pub combine_output_records: i64,
    pub spilled_records: i64,

    pub physical_memory_bytes: i64,
    pub total_committed_bytes: i64,
}

impl CumulativeCounters {
    pub fn combine_records(&self) -> CombineRecords {
        CombineRecords::new(self.combine_input_records, self.combine_output_records)
    }
}
