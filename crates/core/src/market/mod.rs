pub mod yahoo;

use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;

/// One daily close, oldest-first in any series we hand around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub at: DateTime<Utc>,
    pub close: f64,
}

/// One index per digest country.
#[derive(Debug, Clone, Copy)]
pub struct IndexSpec {
    pub label: &'static str,
    pub symbol: &'static str,
}

pub const TRACKED_INDICES: &[IndexSpec] = &[
    IndexSpec { label: "S&P 500", symbol: "^GSPC" },
    IndexSpec { label: "SSE Composite", symbol: "000001.SS" },
    IndexSpec { label: "EURO STOXX 50", symbol: "^STOXX50E" },
    IndexSpec { label: "Nikkei 225", symbol: "^N225" },
    IndexSpec { label: "SENSEX", symbol: "^BSESN" },
    IndexSpec { label: "KOSPI", symbol: "^KS11" },
    IndexSpec { label: "VN-Index", symbol: "^VNINDEX" },
    IndexSpec { label: "SET", symbol: "^SET.BK" },
];

/// Year-to-date percentage change, or the sentinel when the series could not
/// be fetched. The sentinel renders as `n/a` so degraded numbers stay
/// visibly distinct from real ones in the digest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum YtdReturn {
    Pct(f64),
    Unavailable,
}

impl fmt::Display for YtdReturn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YtdReturn::Pct(pct) => write!(f, "{pct:+.2}%"),
            YtdReturn::Unavailable => write!(f, "n/a"),
        }
    }
}

/// `(last - first) / first * 100` over the series; empty input is the
/// sentinel, never an error.
pub fn ytd_return(series: &[PricePoint]) -> YtdReturn {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return YtdReturn::Unavailable;
    };
    if first.close == 0.0 {
        return YtdReturn::Unavailable;
    }
    YtdReturn::Pct((last.close - first.close) / first.close * 100.0)
}

#[derive(Debug, Clone)]
pub struct IndexYtd {
    pub label: &'static str,
    pub symbol: &'static str,
    pub ytd: YtdReturn,
}

/// Fetch YTD returns for every tracked index. Symbols are independent: a
/// failed fetch logs a warning and degrades that symbol to the sentinel,
/// and the batch always returns one line per index.
pub async fn fetch_ytd_batch(
    client: &yahoo::YahooChartClient,
    indices: &[IndexSpec],
    from: NaiveDate,
    until: DateTime<Utc>,
) -> Vec<IndexYtd> {
    let mut out = Vec::with_capacity(indices.len());
    for idx in indices {
        let ytd = match client.fetch_daily_closes(idx.symbol, from, until).await {
            Ok(series) => {
                if series.is_empty() {
                    tracing::warn!(symbol = idx.symbol, "empty price series; marking unavailable");
                }
                ytd_return(&series)
            }
            Err(err) => {
                tracing::warn!(symbol = idx.symbol, error = %err, "price history fetch failed; marking unavailable");
                YtdReturn::Unavailable
            }
        };
        out.push(IndexYtd {
            label: idx.label,
            symbol: idx.symbol,
            ytd,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn point(day: u32, close: f64) -> PricePoint {
        PricePoint {
            at: Utc.with_ymd_and_hms(2026, 1, day, 0, 0, 0).unwrap(),
            close,
        }
    }

    #[test]
    fn positive_ytd_return() {
        let series = [point(2, 100.0), point(30, 110.0)];
        assert_eq!(ytd_return(&series), YtdReturn::Pct(10.0));
        assert_eq!(ytd_return(&series).to_string(), "+10.00%");
    }

    #[test]
    fn negative_ytd_return() {
        let series = [point(2, 100.0), point(30, 90.0)];
        assert_eq!(ytd_return(&series), YtdReturn::Pct(-10.0));
        assert_eq!(ytd_return(&series).to_string(), "-10.00%");
    }

    #[test]
    fn empty_series_is_the_sentinel() {
        assert_eq!(ytd_return(&[]), YtdReturn::Unavailable);
        assert_eq!(YtdReturn::Unavailable.to_string(), "n/a");
    }

    #[test]
    fn single_point_series_is_flat() {
        let series = [point(2, 100.0)];
        assert_eq!(ytd_return(&series), YtdReturn::Pct(0.0));
    }

    #[test]
    fn zero_first_close_is_the_sentinel() {
        let series = [point(2, 0.0), point(30, 90.0)];
        assert_eq!(ytd_return(&series), YtdReturn::Unavailable);
    }
}
