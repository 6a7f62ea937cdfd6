use serde::{Deserialize, Serialize};

/// Tamaño por defecto del buffer de ordenamiento (io.sort.mb).
pub const DEFAULT_IO_SORT_MB: i64 = 100;

/// Parámetros de configuración del job que afectan al perfil de la tarea.
/// El parseo de la configuración real lo hace el recolector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobConf {
    #[serde(default = "default_io_sort_mb")]
    pub io_sort_mb: i64,
    /// Clase de combine configurada (None si el job no tiene combiner).
    #[serde(default)]
    pub combine_class: Option<String>,
}

fn default_io_sort_mb() -> i64 {
    DEFAULT_IO_SORT_MB
}

impl Default for JobConf {
    fn default() -> Self {
        Self {
            io_sort_mb: DEFAULT_IO_SORT_MB,
            combine_class: None,
        }
    }
}

impl JobConf {
    pub fn with_combiner(mut self, class: impl Into<String>) -> Self {
        self.combine_class = Some(class.into());
        self
    }

    pub fn has_combiner(&self) -> bool {
        self.combine_class.is_some()
    }
}
