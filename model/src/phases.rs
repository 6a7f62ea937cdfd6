use serde::Serialize;

use crate::counters::CumulativeCounters;
use crate::events::CombineRecords;

/// Rango de entrada asignado a la tarea.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InputSplit {
    pub split_bytes: i64,
}

/// Límite blando y capacidad de uno de los buffers de ordenamiento.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BufferLimits {
    pub soft_limit: i64,
    pub capacity: i64,
}

/// Configuración del buffer de ordenamiento/spill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpillBuffer {
    pub io_sort_mb: i64,
    /// buffer de datos (kvbuffer)
    pub data: BufferLimits,
    /// buffer de offsets de registros (kvoffsets)
    pub records: BufferLimits,
}

/// Entrada/salida de la función map.
/// `t_` viene de la metadata del split, `c_` de los contadores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MapFunc {
    pub t_map_input_bytes: i64,
    pub c_map_input_bytes: i64,
    pub c_map_input_records: i64,
    pub c_map_output_bytes: i64,
    pub c_map_output_records: i64,
}

impl MapFunc {
    pub(crate) fn apply_counters(&mut self, c: &CumulativeCounters) {
        self.c_map_input_bytes = c.hdfs_bytes_read;
        self.c_map_input_records = c.map_input_records;
        self.c_map_output_bytes = c.map_output_bytes;
        self.c_map_output_records = c.map_output_records;
    }
}

/// Resumen de un paso de combine (en memoria o en disco).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CombineSummary {
    /// Registros considerados para el combine en el último evento.
    pub t_combine_input_records: i64,
    pub c_combine_input_records: i64,
    pub c_combine_output_records: i64,
}

impl CombineSummary {
    pub fn new(t_combine_input_records: i64, attributed: CombineRecords) -> Self {
        Self {
            t_combine_input_records,
            c_combine_input_records: attributed.input,
            c_combine_output_records: attributed.output,
        }
    }

    pub fn attributed(&self) -> CombineRecords {
        CombineRecords::new(self.c_combine_input_records, self.c_combine_output_records)
    }

    /// salida / entrada, si hubo entrada.
    pub fn ratio(&self) -> Option<f64> {
        if self.c_combine_input_records > 0 {
            Some(self.c_combine_output_records as f64 / self.c_combine_input_records as f64)
        } else {
            None
        }
    }
}

/// Combine en memoria, durante los spills.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MemCombineFunc(pub CombineSummary);

/// Combine en disco, durante los merges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DiskCombineFunc(pub CombineSummary);

impl std::ops::Deref for MemCombineFunc {
    type Target = CombineSummary;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::Deref for DiskCombineFunc {
    type Target = CombineSummary;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Uso de disco local y memoria de la tarea.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskResources {
    pub file_bytes_read: i64,
    pub file_bytes_written: i64,
    pub physical_memory_bytes: i64,
    pub total_committed_bytes: i64,
}

impl From<&CumulativeCounters> for TaskResources {
    fn from(c: &CumulativeCounters) -> Self {
        Self {
            file_bytes_read: c.file_bytes_read,
            file_bytes_written: c.file_bytes_written,
            physical_memory_bytes: c.physical_memory_bytes,
            total_committed_bytes: c.total_committed_bytes,
        }
    }
}
