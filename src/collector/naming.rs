//! Export filename policy

use crate::numbering::{ChartNumbering, NumberLookup};
use crate::output::sanitize;
use tracing::{debug, warn};

/// Pick the filename (without extension) for a chart.
///
/// A non-blank number from the numbering table gives `{number}-{title}`.
/// A blank number, a missing row or no table at all gives `{id}-{title}`.
/// The result is always sanitised.
pub fn resolve_filename(chart_id: &str, title: &str, numbering: Option<&ChartNumbering>) -> String {
    let Some(numbering) = numbering else {
        return sanitize(&format!("{chart_id}-{title}"));
    };

    match numbering.lookup(chart_id) {
        NumberLookup::Found(number) => {
            debug!("Chart {} numbered {}", chart_id, number);
            sanitize(&format!("{number}-{title}"))
        }
        NumberLookup::Blank => {
            warn!(
                "Chart {} has a blank number in the numbering table, using chart ID",
                chart_id
            );
            sanitize(&format!("{chart_id}-{title}"))
        }
        NumberLookup::Missing => {
            warn!(
                "Chart {} not found in the numbering table, using chart ID",
                chart_id
            );
            sanitize(&format!("{chart_id}-{title}"))
        }
    }
}
