use crate::market::IndexYtd;
use crate::search::SearchSnippet;

const RULE_LINE: &str = "--------------------";

/// The economist prompt the source digests converged on. Data blocks are
/// appended only when the gatherers produced something, so a bare run still
/// yields a usable instruction.
pub fn build_prompt(
    long_date_label: &str,
    markets: &[IndexYtd],
    snippets: &[SearchSnippet],
) -> String {
    let mut out = format!("Role: Senior Economist.\nCurrent Date: {long_date_label}\n\n");
    out.push_str(&[
        "Task: Retrieve the MOST RECENTLY RELEASED official economic indicators available as of TODAY.",
        "Countries: 🇺🇸US, 🇨🇳China, 🇪🇺Eurozone, 🇯🇵Japan, 🇮🇳India, 🇰🇷Korea, 🇻🇳Vietnam, 🇹🇭Thailand.",
        "",
        "Format Definitions:",
        "- [Prev]: The data from the period BEFORE the latest release.",
        "- [Actual]: The LATEST OFFICIAL RELEASED number (e.g., if today is Dec, CPI might be Nov data).",
        "- [Est]: The Consensus Forecast for the next release (if available, else \"-\").",
        "",
        "Required Output Format (Single consolidated message in THAI):",
        "[Flag] [Country Name in Thai]",
        "• GDP: [Prev]% ➡ [Actual]% (Est [Est]%)",
        "• CPI: [Prev]% ➡ [Actual]% (Est [Est]%)",
        "• Rate: [Prev]% ➡ [Actual]% (Est [Est]%)",
        "• PMI: [Prev] ➡ [Actual] [Emoji]",
        "• Stock YTD: [Index Name] [Return]%",
        "",
        "PMI Emoji: 🟢(>50), 🔴(<50), ⚪(=50)",
        "",
        "Strict Rules:",
        "1. Do NOT say \"data not available for current month\". Always provide the LATEST AVAILABLE data from previous months/quarters.",
        "2. Only use OFFICIAL numbers.",
        "3. Add \"💡 Analyst View\" at the bottom (2 sentences summary).",
    ]
    .join("\n"));

    if !markets.is_empty() {
        out.push_str("\n\nVerified Stock YTD data (use these numbers as-is; n/a means unavailable):\n");
        for m in markets {
            out.push_str(&format!("- {} ({}): {}\n", m.label, m.symbol, m.ytd));
        }
    }

    if !snippets.is_empty() {
        out.push_str("\nRecent headlines (context only, do not quote verbatim):\n");
        for s in snippets {
            out.push_str(&format!("- {}: {}\n", s.title, s.snippet));
        }
    }

    out
}

/// Static header/footer around the generated (or error) body.
pub fn wrap_message(body: &str, short_date_label: &str) -> String {
    format!(
        "📊 สรุปเศรษฐกิจโลก (ล่าสุด)\n📅 ข้อมูล ณ {short_date_label}\n{RULE_LINE}\n{body}\n{RULE_LINE}\n⚠️ AI Generated: เช็คข้อมูลทางการอีกครั้ง"
    )
}
