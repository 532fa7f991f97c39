use super::ResultLog;

pub const HEADER: &str = "--- Compatibility Report ---";

/// Header line, then one result line per output line.
pub fn encode(log: &ResultLog) -> String {
    let mut out = String::with_capacity(HEADER.len() + 1 + log.lines().iter().map(|l| l.len() + 1).sum::<usize>());
    out.push_str(HEADER);
    out.push('\n');
    for line in log.lines() {
        out.push_str(line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_header_and_lines() {
        let log = ResultLog::from(vec![
            "Tested Network Card: en0 — Ping Success ✅".to_string(),
            "Measured power usage of en0 — Simulated: 15W".to_string(),
        ]);
        assert_eq!(
            encode(&log),
            "--- Compatibility Report ---\n\
             Tested Network Card: en0 — Ping Success ✅\n\
             Measured power usage of en0 — Simulated: 15W\n"
        );
    }

    #[test]
    fn test_encode_empty_log() {
        assert_eq!(encode(&ResultLog::new()), "--- Compatibility Report ---\n");
    }
}
