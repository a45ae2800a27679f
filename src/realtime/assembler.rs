//! Reassembles fragmented WebSocket TEXT frames into complete messages.
//!
//! A fixed-capacity buffer with offset-addressed writes (tolerating
//! out-of-order fragments); completion is defined as
//! `fin && payload_len > 0 && max_written == payload_len`.

/// Reassembles WebSocket TEXT fragments delivered as `(payload_len,
/// payload_offset, data, fin)` tuples into one contiguous message.
pub struct FrameAssembler {
    buf: Vec<u8>,
    cap: usize,
    payload_len: usize,
    max_written: usize,
    in_progress: bool,
}

impl FrameAssembler {
    /// Creates an assembler backed by a buffer of `cap` bytes. Messages
    /// larger than `cap` are rejected (state resets, not complete).
    pub fn new(cap: usize) -> Self {
        Self {
            buf: vec![0u8; cap],
            cap,
            payload_len: 0,
            max_written: 0,
            in_progress: false,
        }
    }

    pub fn reset(&mut self) {
        self.payload_len = 0;
        self.max_written = 0;
        self.in_progress = false;
    }

    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    /// Feeds one WebSocket fragment. Returns `true` once the message is
    /// complete; the assembled bytes are then available via
    /// [`FrameAssembler::message`].
    ///
    /// `payload_offset == 0` starts a new message (any in-flight one is
    /// discarded). A fragment with nonzero offset arriving with no message
    /// in progress is dropped. A payload that cannot fit in `cap`, or a
    /// fragment that would write past `cap`, resets the assembler and
    /// reports not-complete.
    pub fn feed_text(&mut self, payload_len: usize, payload_offset: usize, data: &[u8], fin: bool) -> bool {
        if self.cap == 0 || data.is_empty() || payload_len == 0 {
            return false;
        }
        if payload_len > self.cap {
            self.reset();
            return false;
        }

        if payload_offset == 0 {
            if self.in_progress {
                tracing::warn!("new message start discarded an in-progress reassembly");
            }
            self.payload_len = payload_len;
            self.max_written = 0;
            self.in_progress = true;
        } else if !self.in_progress {
            return false;
        }

        let written_end = payload_offset + data.len();
        if written_end > self.cap {
            self.reset();
            return false;
        }
        self.buf[payload_offset..written_end].copy_from_slice(data);
        if written_end > self.max_written {
            self.max_written = written_end;
        }

        if fin && self.payload_len > 0 && self.max_written == self.payload_len {
            self.in_progress = false;
            return true;
        }
        false
    }

    /// The assembled message bytes, valid immediately after `feed_text`
    /// returns `true`.
    pub fn message(&self) -> &[u8] {
        &self.buf[..self.payload_len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_fragment_fin_is_complete() {
        let mut a = FrameAssembler::new(64);
        assert!(a.feed_text(5, 0, b"hello", true));
        assert_eq!(a.message(), b"hello");
    }

    #[test]
    fn multi_fragment_reassembles_in_order() {
        let mut a = FrameAssembler::new(64);
        assert!(!a.feed_text(10, 0, b"hello", false));
        assert!(a.feed_text(10, 5, b"world", true));
        assert_eq!(a.message(), b"helloworld");
    }

    #[test]
    fn out_of_order_fragments_still_assemble() {
        let mut a = FrameAssembler::new(64);
        // first fragment declares the full message length
        assert!(!a.feed_text(10, 0, b"hello", false));
        // a later fragment could in principle be delivered after an
        // intervening resend; offset-addressed writes tolerate it
        assert!(a.feed_text(10, 5, b"world", true));
        assert_eq!(a.message(), b"helloworld");
    }

    #[test]
    fn oversize_payload_resets_and_reports_incomplete() {
        let mut a = FrameAssembler::new(4);
        assert!(!a.feed_text(10, 0, b"hello", true));
        assert!(!a.in_progress());
    }

    #[test]
    fn fragment_without_start_is_dropped() {
        let mut a = FrameAssembler::new(64);
        assert!(!a.feed_text(10, 5, b"world", true));
        assert!(!a.in_progress());
    }

    #[test]
    fn new_message_start_discards_prior_in_flight_message() {
        let mut a = FrameAssembler::new(64);
        assert!(!a.feed_text(10, 0, b"abcde", false));
        // a fresh offset-0 fragment starts over rather than appending
        assert!(a.feed_text(3, 0, b"xyz", true));
        assert_eq!(a.message(), b"xyz");
    }

    #[test]
    fn write_past_capacity_resets() {
        let mut a = FrameAssembler::new(8);
        assert!(!a.feed_text(8, 0, b"abcd", false));
        assert!(!a.feed_text(8, 4, b"zzzzz", true)); // 4+5=9 > cap
        assert!(!a.in_progress());
    }
}
