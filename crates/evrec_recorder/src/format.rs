//! Event log record encoding.
//!
//! A log is a flat sequence of records with no file header:
//!
//! ```text
//! record := body_len: u32 | body
//! body   := timestamp: i64 | tag: u8 | payload
//! paths  := count: u32 | count * (len: u32 | path bytes)
//! ```
//!
//! All integers are little-endian; floats are stored as their IEEE-754 bits.
//! Path bytes are the raw OS string on Unix and UTF-8 elsewhere.
//! The length prefix lets a reader skip records with unknown tags and stop
//! cleanly at a truncated tail.

use crate::error::FormatError;
use crate::timestamp::Timestamp;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use evrec_platform::{Event, KeyCode, Modifiers, MonitorId};
use std::io::{self, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// Size of the length prefix in front of every record body
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Bytes of every body before the payload: timestamp + tag
pub const BODY_HEADER_SIZE: usize = 9;

/// Event tags
pub const TAG_WINDOW_MOVED: u8 = 1;
pub const TAG_WINDOW_RESIZED: u8 = 2;
pub const TAG_WINDOW_CLOSED: u8 = 3;
pub const TAG_WINDOW_REFRESH: u8 = 4;
pub const TAG_WINDOW_FOCUSED: u8 = 5;
pub const TAG_WINDOW_DEFOCUSED: u8 = 6;
pub const TAG_WINDOW_ICONIFIED: u8 = 7;
pub const TAG_WINDOW_UNICONIFIED: u8 = 8;
pub const TAG_FRAMEBUFFER_RESIZED: u8 = 9;
pub const TAG_BUTTON_PRESSED: u8 = 10;
pub const TAG_BUTTON_RELEASED: u8 = 11;
pub const TAG_CURSOR_MOVED: u8 = 12;
pub const TAG_CURSOR_ENTERED: u8 = 13;
pub const TAG_CURSOR_LEFT: u8 = 14;
pub const TAG_SCROLLED: u8 = 15;
pub const TAG_KEY_PRESSED: u8 = 16;
pub const TAG_KEY_REPEATED: u8 = 17;
pub const TAG_KEY_RELEASED: u8 = 18;
pub const TAG_CODEPOINT_INPUT: u8 = 19;
pub const TAG_MONITOR_CONNECTED: u8 = 20;
pub const TAG_MONITOR_DISCONNECTED: u8 = 21;
pub const TAG_FILE_DROPPED: u8 = 22;
pub const TAG_JOYSTICK_CONNECTED: u8 = 23;
pub const TAG_JOYSTICK_DISCONNECTED: u8 = 24;
pub const TAG_WINDOW_MAXIMIZED: u8 = 25;
pub const TAG_WINDOW_UNMAXIMIZED: u8 = 26;
pub const TAG_WINDOW_SCALE_CHANGED: u8 = 27;

/// An event stamped with the wall-clock second it was captured in.
#[derive(Clone, Debug, PartialEq)]
pub struct TimestampedEvent {
    pub timestamp: Timestamp,
    pub event: Event,
}

impl TimestampedEvent {
    pub fn new(timestamp: Timestamp, event: Event) -> Self {
        Self { timestamp, event }
    }
}

/// Wire tag for an event
pub fn event_tag(event: &Event) -> u8 {
    match event {
        Event::WindowMoved { .. } => TAG_WINDOW_MOVED,
        Event::WindowResized { .. } => TAG_WINDOW_RESIZED,
        Event::WindowClosed => TAG_WINDOW_CLOSED,
        Event::WindowRefresh => TAG_WINDOW_REFRESH,
        Event::WindowFocused => TAG_WINDOW_FOCUSED,
        Event::WindowDefocused => TAG_WINDOW_DEFOCUSED,
        Event::WindowIconified => TAG_WINDOW_ICONIFIED,
        Event::WindowUniconified => TAG_WINDOW_UNICONIFIED,
        Event::FramebufferResized { .. } => TAG_FRAMEBUFFER_RESIZED,
        Event::ButtonPressed { .. } => TAG_BUTTON_PRESSED,
        Event::ButtonReleased { .. } => TAG_BUTTON_RELEASED,
        Event::CursorMoved { .. } => TAG_CURSOR_MOVED,
        Event::CursorEntered => TAG_CURSOR_ENTERED,
        Event::CursorLeft => TAG_CURSOR_LEFT,
        Event::Scrolled { .. } => TAG_SCROLLED,
        Event::KeyPressed { .. } => TAG_KEY_PRESSED,
        Event::KeyRepeated { .. } => TAG_KEY_REPEATED,
        Event::KeyReleased { .. } => TAG_KEY_RELEASED,
        Event::CodepointInput { .. } => TAG_CODEPOINT_INPUT,
        Event::MonitorConnected { .. } => TAG_MONITOR_CONNECTED,
        Event::MonitorDisconnected { .. } => TAG_MONITOR_DISCONNECTED,
        Event::FileDropped { .. } => TAG_FILE_DROPPED,
        Event::JoystickConnected { .. } => TAG_JOYSTICK_CONNECTED,
        Event::JoystickDisconnected { .. } => TAG_JOYSTICK_DISCONNECTED,
        Event::WindowMaximized => TAG_WINDOW_MAXIMIZED,
        Event::WindowUnmaximized => TAG_WINDOW_UNMAXIMIZED,
        Event::WindowScaleChanged { .. } => TAG_WINDOW_SCALE_CHANGED,
    }
}

/// Encode the body (timestamp, tag, payload) of one record
pub fn encode_body(record: &TimestampedEvent) -> io::Result<Vec<u8>> {
    let mut w = Vec::with_capacity(BODY_HEADER_SIZE + 16);
    w.write_i64::<LittleEndian>(record.timestamp.as_secs())?;
    w.write_u8(event_tag(&record.event))?;

    match &record.event {
        Event::WindowMoved { x, y } | Event::CursorMoved { x, y } => {
            w.write_i32::<LittleEndian>(*x)?;
            w.write_i32::<LittleEndian>(*y)?;
        }
        Event::WindowResized { width, height } | Event::FramebufferResized { width, height } => {
            w.write_u32::<LittleEndian>(*width)?;
            w.write_u32::<LittleEndian>(*height)?;
        }
        Event::ButtonPressed { button, mods } | Event::ButtonReleased { button, mods } => {
            w.write_u8(*button)?;
            w.write_u8(mods.bits())?;
        }
        Event::Scrolled { x, y } => {
            w.write_f64::<LittleEndian>(*x)?;
            w.write_f64::<LittleEndian>(*y)?;
        }
        Event::KeyPressed {
            key,
            scancode,
            mods,
        }
        | Event::KeyRepeated {
            key,
            scancode,
            mods,
        }
        | Event::KeyReleased {
            key,
            scancode,
            mods,
        } => {
            w.write_u32::<LittleEndian>(key.0)?;
            w.write_u32::<LittleEndian>(*scancode)?;
            w.write_u8(mods.bits())?;
        }
        Event::CodepointInput { codepoint } => {
            w.write_u32::<LittleEndian>(*codepoint)?;
        }
        Event::MonitorConnected { monitor } | Event::MonitorDisconnected { monitor } => {
            w.write_u32::<LittleEndian>(monitor.0)?;
        }
        Event::JoystickConnected { joystick } | Event::JoystickDisconnected { joystick } => {
            w.write_i32::<LittleEndian>(*joystick)?;
        }
        Event::FileDropped { paths } => {
            w.write_u32::<LittleEndian>(len_u32(paths.len())?)?;
            for path in paths {
                let bytes = path_bytes(path)?;
                w.write_u32::<LittleEndian>(len_u32(bytes.len())?)?;
                w.write_all(bytes)?;
            }
        }
        Event::WindowScaleChanged { x, y } => {
            w.write_f32::<LittleEndian>(*x)?;
            w.write_f32::<LittleEndian>(*y)?;
        }
        Event::WindowClosed
        | Event::WindowRefresh
        | Event::WindowFocused
        | Event::WindowDefocused
        | Event::WindowIconified
        | Event::WindowUniconified
        | Event::CursorEntered
        | Event::CursorLeft
        | Event::WindowMaximized
        | Event::WindowUnmaximized => {}
    }

    Ok(w)
}

/// Append one length-prefixed record, returning the number of bytes written
pub fn write_record<W: Write>(mut w: W, record: &TimestampedEvent) -> io::Result<usize> {
    let body = encode_body(record)?;
    w.write_u32::<LittleEndian>(len_u32(body.len())?)?;
    w.write_all(&body)?;
    Ok(LENGTH_PREFIX_SIZE + body.len())
}

fn len_u32(len: usize) -> io::Result<u32> {
    u32::try_from(len).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("field length {len} does not fit in a record"),
        )
    })
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> io::Result<&[u8]> {
    use std::os::unix::ffi::OsStrExt;
    Ok(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> io::Result<&[u8]> {
    path.to_str().map(str::as_bytes).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("path {} is not valid UTF-8", path.display()),
        )
    })
}

#[cfg(unix)]
fn path_from_bytes(bytes: Vec<u8>) -> Result<PathBuf, FormatError> {
    use std::os::unix::ffi::OsStringExt;
    Ok(PathBuf::from(std::ffi::OsString::from_vec(bytes)))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: Vec<u8>) -> Result<PathBuf, FormatError> {
    String::from_utf8(bytes)
        .map(PathBuf::from)
        .map_err(|_| FormatError::InvalidPath)
}

/// Decode a record body produced by [`encode_body`]
pub fn decode_body(body: &[u8]) -> Result<TimestampedEvent, FormatError> {
    let mut r = Cursor::new(body);
    let timestamp = Timestamp::from_secs(r.read_i64::<LittleEndian>()?);
    let tag = r.read_u8()?;

    let event = match tag {
        TAG_WINDOW_MOVED => Event::WindowMoved {
            x: r.read_i32::<LittleEndian>()?,
            y: r.read_i32::<LittleEndian>()?,
        },
        TAG_WINDOW_RESIZED => Event::WindowResized {
            width: r.read_u32::<LittleEndian>()?,
            height: r.read_u32::<LittleEndian>()?,
        },
        TAG_WINDOW_CLOSED => Event::WindowClosed,
        TAG_WINDOW_REFRESH => Event::WindowRefresh,
        TAG_WINDOW_FOCUSED => Event::WindowFocused,
        TAG_WINDOW_DEFOCUSED => Event::WindowDefocused,
        TAG_WINDOW_ICONIFIED => Event::WindowIconified,
        TAG_WINDOW_UNICONIFIED => Event::WindowUniconified,
        TAG_FRAMEBUFFER_RESIZED => Event::FramebufferResized {
            width: r.read_u32::<LittleEndian>()?,
            height: r.read_u32::<LittleEndian>()?,
        },
        TAG_BUTTON_PRESSED => Event::ButtonPressed {
            button: r.read_u8()?,
            mods: Modifiers::from_bits(r.read_u8()?),
        },
        TAG_BUTTON_RELEASED => Event::ButtonReleased {
            button: r.read_u8()?,
            mods: Modifiers::from_bits(r.read_u8()?),
        },
        TAG_CURSOR_MOVED => Event::CursorMoved {
            x: r.read_i32::<LittleEndian>()?,
            y: r.read_i32::<LittleEndian>()?,
        },
        TAG_CURSOR_ENTERED => Event::CursorEntered,
        TAG_CURSOR_LEFT => Event::CursorLeft,
        TAG_SCROLLED => Event::Scrolled {
            x: r.read_f64::<LittleEndian>()?,
            y: r.read_f64::<LittleEndian>()?,
        },
        TAG_KEY_PRESSED | TAG_KEY_REPEATED | TAG_KEY_RELEASED => {
            let key = KeyCode(r.read_u32::<LittleEndian>()?);
            let scancode = r.read_u32::<LittleEndian>()?;
            let mods = Modifiers::from_bits(r.read_u8()?);
            match tag {
                TAG_KEY_PRESSED => Event::KeyPressed {
                    key,
                    scancode,
                    mods,
                },
                TAG_KEY_REPEATED => Event::KeyRepeated {
                    key,
                    scancode,
                    mods,
                },
                _ => Event::KeyReleased {
                    key,
                    scancode,
                    mods,
                },
            }
        }
        TAG_CODEPOINT_INPUT => Event::CodepointInput {
            codepoint: r.read_u32::<LittleEndian>()?,
        },
        TAG_MONITOR_CONNECTED => Event::MonitorConnected {
            monitor: MonitorId(r.read_u32::<LittleEndian>()?),
        },
        TAG_MONITOR_DISCONNECTED => Event::MonitorDisconnected {
            monitor: MonitorId(r.read_u32::<LittleEndian>()?),
        },
        TAG_FILE_DROPPED => Event::FileDropped {
            paths: read_paths(&mut r)?,
        },
        TAG_JOYSTICK_CONNECTED => Event::JoystickConnected {
            joystick: r.read_i32::<LittleEndian>()?,
        },
        TAG_JOYSTICK_DISCONNECTED => Event::JoystickDisconnected {
            joystick: r.read_i32::<LittleEndian>()?,
        },
        TAG_WINDOW_MAXIMIZED => Event::WindowMaximized,
        TAG_WINDOW_UNMAXIMIZED => Event::WindowUnmaximized,
        TAG_WINDOW_SCALE_CHANGED => Event::WindowScaleChanged {
            x: r.read_f32::<LittleEndian>()?,
            y: r.read_f32::<LittleEndian>()?,
        },
        other => return Err(FormatError::UnknownTag(other)),
    };

    Ok(TimestampedEvent { timestamp, event })
}

fn read_paths(r: &mut Cursor<&[u8]>) -> Result<Vec<PathBuf>, FormatError> {
    let count = r.read_u32::<LittleEndian>()? as usize;
    // Every path costs at least its own length prefix
    if count > remaining(r) / LENGTH_PREFIX_SIZE {
        return Err(FormatError::Truncated);
    }

    let mut paths = Vec::with_capacity(count);
    for _ in 0..count {
        let len = r.read_u32::<LittleEndian>()? as usize;
        if len > remaining(r) {
            return Err(FormatError::Truncated);
        }
        let mut bytes = vec![0u8; len];
        r.read_exact(&mut bytes)?;
        paths.push(path_from_bytes(bytes)?);
    }
    Ok(paths)
}

fn remaining(r: &Cursor<&[u8]>) -> usize {
    r.get_ref().len().saturating_sub(r.position() as usize)
}

/// Result of decoding a whole log buffer
#[derive(Debug, Default)]
pub struct DecodedLog {
    /// Records in file order
    pub records: Vec<TimestampedEvent>,
    /// Complete records that could not be decoded and were skipped
    pub skipped: usize,
    /// Bytes of an incomplete record at the end of the buffer
    pub trailing_bytes: usize,
}

/// Decode every complete record in `bytes`.
///
/// An incomplete record at the end is ignored. Complete records that fail to
/// decode (unknown tag, malformed payload) are logged and skipped.
pub fn decode_records(bytes: &[u8]) -> DecodedLog {
    let mut log = DecodedLog::default();
    let mut offset = 0usize;

    while offset < bytes.len() {
        let rest = &bytes[offset..];
        if rest.len() < LENGTH_PREFIX_SIZE {
            log.trailing_bytes = rest.len();
            break;
        }

        let body_len = u32::from_le_bytes([rest[0], rest[1], rest[2], rest[3]]) as usize;
        let Some(body) = rest.get(LENGTH_PREFIX_SIZE..LENGTH_PREFIX_SIZE + body_len) else {
            log.trailing_bytes = rest.len();
            break;
        };

        match decode_body(body) {
            Ok(record) => log.records.push(record),
            Err(FormatError::UnknownTag(tag)) => {
                error!("Unknown event {} at offset {}, skipping", tag, offset);
                log.skipped += 1;
            }
            Err(e) => {
                warn!("Malformed record at offset {}: {}, skipping", offset, e);
                log.skipped += 1;
            }
        }

        offset += LENGTH_PREFIX_SIZE + body_len;
    }

    if log.trailing_bytes > 0 {
        debug!(
            "Ignoring {} trailing bytes of an incomplete record",
            log.trailing_bytes
        );
    }

    log
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(record: &TimestampedEvent) -> Vec<u8> {
        let mut buf = Vec::new();
        write_record(&mut buf, record).unwrap();
        buf
    }

    fn sample_events() -> Vec<Event> {
        vec![
            Event::WindowMoved { x: -5, y: 40 },
            Event::WindowResized {
                width: 1024,
                height: 768,
            },
            Event::WindowClosed,
            Event::ButtonPressed {
                button: 1,
                mods: Modifiers::from_bits(Modifiers::CTRL),
            },
            Event::Scrolled { x: 0.25, y: -3.0 },
            Event::KeyRepeated {
                key: KeyCode::A,
                scancode: 0x1e,
                mods: Modifiers::NONE,
            },
            Event::CodepointInput { codepoint: 0x1F600 },
            Event::MonitorConnected {
                monitor: MonitorId(2),
            },
            Event::FileDropped {
                paths: vec![PathBuf::from("/tmp/a.png"), PathBuf::from("notes é.txt")],
            },
            Event::JoystickDisconnected { joystick: 3 },
            Event::WindowScaleChanged { x: 2.0, y: 1.5 },
        ]
    }

    #[test]
    fn records_decode_to_the_same_events() {
        let records: Vec<_> = sample_events()
            .into_iter()
            .enumerate()
            .map(|(i, e)| TimestampedEvent::new(Timestamp::from_secs(1_700_000_000 + i as i64), e))
            .collect();

        let mut bytes = Vec::new();
        for record in &records {
            write_record(&mut bytes, record).unwrap();
        }

        let log = decode_records(&bytes);
        assert_eq!(log.records, records);
        assert_eq!(log.skipped, 0);
        assert_eq!(log.trailing_bytes, 0);
    }

    #[test]
    fn record_size_matches_layout() {
        let record = TimestampedEvent::new(Timestamp::from_secs(1), Event::WindowMoved { x: 1, y: 2 });
        let bytes = encode(&record);
        assert_eq!(bytes.len(), LENGTH_PREFIX_SIZE + BODY_HEADER_SIZE + 8);
        assert_eq!(&bytes[..4], &(BODY_HEADER_SIZE as u32 + 8).to_le_bytes());
        assert_eq!(bytes[4 + 8], TAG_WINDOW_MOVED);
    }

    #[test]
    fn dropped_file_paths_survive() {
        let record = TimestampedEvent::new(
            Timestamp::from_secs(7),
            Event::FileDropped {
                paths: vec![
                    PathBuf::from("first"),
                    PathBuf::from(""),
                    PathBuf::from("a/much/longer/path/to/a/file.bin"),
                ],
            },
        );
        let bytes = encode(&record);
        let decoded = decode_body(&bytes[LENGTH_PREFIX_SIZE..]).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn unknown_tag_is_skipped() {
        let first = TimestampedEvent::new(Timestamp::from_secs(1), Event::WindowFocused);
        let last = TimestampedEvent::new(Timestamp::from_secs(2), Event::WindowDefocused);

        let mut bytes = encode(&first);
        let mut bogus = encode(&first);
        bogus[LENGTH_PREFIX_SIZE + 8] = 200;
        bytes.extend_from_slice(&bogus);
        bytes.extend_from_slice(&encode(&last));

        let log = decode_records(&bytes);
        assert_eq!(log.records, vec![first, last]);
        assert_eq!(log.skipped, 1);
    }

    #[test]
    fn truncated_tail_is_ignored() {
        let record = TimestampedEvent::new(Timestamp::from_secs(1), Event::CursorMoved { x: 3, y: 4 });
        let full = encode(&record);

        for cut in 1..full.len() {
            let mut bytes = full.clone();
            bytes.extend_from_slice(&full[..cut]);
            let log = decode_records(&bytes);
            assert_eq!(log.records.len(), 1, "cut at {cut}");
            assert_eq!(log.trailing_bytes, cut);
            assert_eq!(log.skipped, 0);
        }
    }

    #[test]
    fn short_payload_is_malformed() {
        let record = TimestampedEvent::new(Timestamp::from_secs(1), Event::WindowMoved { x: 1, y: 2 });
        let bytes = encode(&record);
        let body = &bytes[LENGTH_PREFIX_SIZE..bytes.len() - 2];
        assert_eq!(decode_body(body), Err(FormatError::Truncated));
    }

    #[test]
    fn oversized_path_count_is_rejected() {
        let mut body = Vec::new();
        body.write_i64::<LittleEndian>(0).unwrap();
        body.write_u8(TAG_FILE_DROPPED).unwrap();
        body.write_u32::<LittleEndian>(u32::MAX).unwrap();
        assert_eq!(decode_body(&body), Err(FormatError::Truncated));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_path_keeps_its_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = PathBuf::from(OsStr::from_bytes(b"/tmp/caf\xe9.txt"));
        let record = TimestampedEvent::new(
            Timestamp::from_secs(7),
            Event::FileDropped {
                paths: vec![path.clone(), PathBuf::from("/tmp/plain.txt")],
            },
        );

        let bytes = encode(&record);
        let decoded = decode_body(&bytes[LENGTH_PREFIX_SIZE..]).unwrap();
        match decoded.event {
            Event::FileDropped { paths } => {
                assert_eq!(paths[0].as_os_str().as_bytes(), b"/tmp/caf\xe9.txt");
                assert_eq!(paths[0], path);
                assert_eq!(paths[1], PathBuf::from("/tmp/plain.txt"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[cfg(not(unix))]
    #[test]
    fn invalid_utf8_path_is_rejected() {
        let mut body = Vec::new();
        body.write_i64::<LittleEndian>(0).unwrap();
        body.write_u8(TAG_FILE_DROPPED).unwrap();
        body.write_u32::<LittleEndian>(1).unwrap();
        body.write_u32::<LittleEndian>(2).unwrap();
        body.extend_from_slice(&[0xff, 0xfe]);
        assert_eq!(decode_body(&body), Err(FormatError::InvalidPath));
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        let log = decode_records(&[]);
        assert!(log.records.is_empty());
        assert_eq!(log.trailing_bytes, 0);
    }
}
