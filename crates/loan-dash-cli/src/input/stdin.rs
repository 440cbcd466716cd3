use std::io::{self, Read};

use loan_dash_core::aggregate::ViewRequest;

/// Read a view request piped on stdin.
/// Returns None when stdin is a terminal or the pipe is empty.
pub fn read_request() -> Result<Option<ViewRequest>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    if buffer.trim().is_empty() {
        return Ok(None);
    }
    super::parse_request(&buffer, "stdin").map(Some)
}
