//! Export request parameters

use serde::{Deserialize, Serialize};

/// Requested height of a rendered export.
///
/// `Auto` and `Full` produce visibly different files: `Auto` matches the
/// height shown in the Datawrapper editor minus the header/footer allowance,
/// while `Full` renders the full native height even for plain exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExportHeight {
    /// Send `height=auto`
    #[default]
    Auto,
    /// Omit the height parameter
    Full,
    /// Fixed height in pixels
    Pixels(u32),
}

/// Parameters of a single `export_chart` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Width in pixels, chart default when `None`
    pub width: Option<u32>,
    /// Height mode
    pub height: ExportHeight,
    /// Border around the chart in pixels
    pub border_width: u32,
    /// Omit header and footer
    pub plain: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: ExportHeight::Auto,
            border_width: 0,
            plain: false,
        }
    }
}

impl ExportOptions {
    /// Query parameters for the export endpoint.
    ///
    /// Only non-default values are sent so the API applies its own defaults.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if let Some(width) = self.width {
            params.push(("width", width.to_string()));
        }
        match self.height {
            ExportHeight::Auto => params.push(("height", "auto".to_string())),
            ExportHeight::Pixels(px) => params.push(("height", px.to_string())),
            ExportHeight::Full => {}
        }
        if self.border_width != 0 {
            params.push(("borderWidth", self.border_width.to_string()));
        }
        if self.plain {
            params.push(("plain", "true".to_string()));
        }

        params
    }
}
