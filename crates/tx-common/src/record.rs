//! The transaction record and its row parser.
//!
//! Input rows are delimited text with four unnamed columns in fixed order:
//! transaction number, client id, volume in RUR, segment label. There is no
//! header and no recovery for malformed rows; a bad row aborts the run with
//! its line number.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One row of the transaction log. Read-only input; never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction number.
    pub tranc_num: u64,
    /// Client identifier; distinct values per segment are counted.
    pub client_id: u64,
    /// Transaction volume in rubles.
    pub volume_rur: f64,
    /// Segment label, e.g. "R" or "AF".
    pub segment: String,
}

impl Transaction {
    /// Parse one delimited row. `line_no` is 1-based and is only used for
    /// error reporting.
    pub fn parse(line: &str, delimiter: char, line_no: usize) -> Result<Self> {
        let fields: Vec<&str> = line.split(delimiter).collect();
        if fields.len() != 4 {
            return Err(Error::Parse {
                line: line_no,
                message: format!("expected 4 columns, got {}", fields.len()),
            });
        }

        let tranc_num = fields[0].trim().parse::<u64>().map_err(|_| Error::Parse {
            line: line_no,
            message: format!("invalid transaction number {:?}", fields[0].trim()),
        })?;
        let client_id = fields[1].trim().parse::<u64>().map_err(|_| Error::Parse {
            line: line_no,
            message: format!("invalid client id {:?}", fields[1].trim()),
        })?;
        let volume_rur = fields[2].trim().parse::<f64>().map_err(|_| Error::Parse {
            line: line_no,
            message: format!("invalid volume {:?}", fields[2].trim()),
        })?;
        let segment = fields[3].trim();
        if segment.is_empty() {
            return Err(Error::Parse {
                line: line_no,
                message: "empty segment label".into(),
            });
        }

        Ok(Transaction {
            tranc_num,
            client_id,
            volume_rur,
            segment: segment.to_string(),
        })
    }
}
