//! Flat binary encoding of a [`Trace`].
//!
//! All integers are little-endian. A buffer starts with a fixed 16 byte header followed by every
//! signal expanded to one value per cycle:
//!
//! ```text
//! [u32 total_size][u32 prop_count][u32 var_count][u32 last_cycle]
//! prop 0: cycles 0..=last_cycle, 1 byte each (0 or 1)
//! ...
//! var 0:  cycles 0..=last_cycle, 4 bytes per scalar or 4 * arity bytes per array
//! ...
//! ```
//!
//! Decoding replays the expanded values through the regular write path, so runs of repeated values
//! collapse back into a single change-point. A trace that was already compressed decodes to an equal
//! trace.
//!
//! The header does not record the shape of each variable. [`decode`] reads every variable as a
//! scalar, and traces holding array variables must be decoded with [`decode_with_layout`].
//!
//! ```rust
//! use hyperprop_core::codec;
//! use hyperprop_core::trace::{Trace, Value};
//!
//! let mut trace = Trace::new(1, 1);
//! trace.update_prop_value(0, 0, true);
//! trace.update_prop_value(0, 1, false);
//! trace.update_term_value(0, 0, Value::Scalar(3));
//! trace.update_term_value(0, 1, Value::Scalar(9));
//!
//! let bytes = codec::encode(&trace).unwrap();
//!
//! assert_eq!(bytes.len(), codec::byte_size(&trace).unwrap());
//! assert_eq!(codec::decode(&bytes).unwrap(), trace);
//! ```

use thiserror::Error;
use tracing::debug;

use crate::catalog::Namespace;
use crate::trace::{Signal, Trace, TraceError, Value, Width};

/// Size of the fixed header in bytes.
pub const HEADER_SIZE: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("buffer truncated at offset {offset}: needed {needed} bytes, {remaining} remaining")]
    Truncated { offset: usize, needed: usize, remaining: usize },

    #[error("header declares {declared} bytes but the buffer holds {actual}")]
    SizeMismatch { declared: usize, actual: usize },

    #[error("header declares {declared} bytes but its layout requires {expected}")]
    LayoutMismatch { declared: usize, expected: usize },

    #[error("header declares {header} variables but the layout describes {layout}")]
    SlotCountMismatch { header: usize, layout: usize },

    #[error("invalid boolean byte {value} at offset {offset}")]
    InvalidBoolean { value: u8, offset: usize },

    #[error("term slot {0} holds no data, its width is unknown")]
    UnknownWidth(usize),

    #[error("{namespace} slot {slot} has no value at cycle 0: {source}")]
    MissingInitialValue {
        namespace: Namespace,
        slot: usize,
        source: TraceError,
    },

    #[error("encoded trace exceeds the 32-bit size limit")]
    Overflow,

    #[error(transparent)]
    TraceError(#[from] TraceError),
}

/// The width of every term slot of `trace`, taken from its first stored value.
pub fn layout(trace: &Trace) -> Result<Vec<Width>, CodecError> {
    trace
        .term_signals()
        .iter()
        .enumerate()
        .map(|(slot, signal)| signal.first().map(Value::width).ok_or(CodecError::UnknownWidth(slot)))
        .collect()
}

fn check_initial<T>(namespace: Namespace, slot: usize, signal: &Signal<T>) -> Result<(), CodecError> {
    signal
        .at(0)
        .map(|_| ())
        .map_err(|source| CodecError::MissingInitialValue { namespace, slot, source })
}

/// The layout of `trace`, once every signal is known to expand from cycle 0.
fn encodable_layout(trace: &Trace) -> Result<Vec<Width>, CodecError> {
    let layout = layout(trace)?;

    for (slot, signal) in trace.prop_signals().iter().enumerate() {
        check_initial(Namespace::Prop, slot, signal)?;
    }

    for (slot, signal) in trace.term_signals().iter().enumerate() {
        check_initial(Namespace::Term, slot, signal)?;
    }

    Ok(layout)
}

fn total_size(num_props: usize, layout: &[Width], cycles: usize) -> Result<usize, CodecError> {
    let row = layout
        .iter()
        .try_fold(num_props, |acc, width| acc.checked_add(width.bytes()))
        .ok_or(CodecError::Overflow)?;

    row.checked_mul(cycles)
        .and_then(|body| body.checked_add(HEADER_SIZE))
        .ok_or(CodecError::Overflow)
}

/// Exact number of bytes [`encode`] produces for `trace`.
///
/// Fails exactly when [`encode`] fails: every term slot needs a width, and every signal needs a
/// value at cycle 0.
pub fn byte_size(trace: &Trace) -> Result<usize, CodecError> {
    total_size(trace.num_props(), &encodable_layout(trace)?, trace.len())
}

fn to_u32(value: usize) -> Result<u32, CodecError> {
    u32::try_from(value).map_err(|_| CodecError::Overflow)
}

struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_value(&mut self, value: &Value) {
        match value {
            Value::Scalar(v) => self.write_u32(*v),
            Value::Array(elements) => elements.iter().for_each(|v| self.write_u32(*v)),
        }
    }
}

/// Serialize `trace` into the binary trace format.
pub fn encode(trace: &Trace) -> Result<Vec<u8>, CodecError> {
    let layout = encodable_layout(trace)?;
    let size = total_size(trace.num_props(), &layout, trace.len())?;
    let last_cycle = trace.last_cycle();
    let mut writer = Writer::with_capacity(size);

    writer.write_u32(to_u32(size)?);
    writer.write_u32(to_u32(trace.num_props())?);
    writer.write_u32(to_u32(trace.num_terms())?);
    writer.write_u32(last_cycle);

    for signal in trace.prop_signals() {
        for cycle in 0..=last_cycle {
            writer.write_u8(u8::from(*signal.at(cycle)?));
        }
    }

    for signal in trace.term_signals() {
        for cycle in 0..=last_cycle {
            writer.write_value(signal.at(cycle)?);
        }
    }

    debug!(bytes = writer.buf.len(), cycles = trace.len(), "encoded trace");
    Ok(writer.buf)
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, needed: usize) -> Result<&'a [u8], CodecError> {
        if self.remaining() < needed {
            return Err(CodecError::Truncated {
                offset: self.pos,
                needed,
                remaining: self.remaining(),
            });
        }

        let bytes = &self.data[self.pos..self.pos + needed];
        self.pos += needed;
        Ok(bytes)
    }

    fn read_bool(&mut self) -> Result<bool, CodecError> {
        let offset = self.pos;

        match self.take(1)?[0] {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(CodecError::InvalidBoolean { value, offset }),
        }
    }

    fn read_u32(&mut self) -> Result<u32, CodecError> {
        let bytes = self.take(4)?;
        let mut word = [0u8; 4];
        word.copy_from_slice(bytes);

        Ok(u32::from_le_bytes(word))
    }

    fn read_value(&mut self, width: Width) -> Result<Value, CodecError> {
        match width {
            Width::Scalar => self.read_u32().map(Value::Scalar),
            Width::Array(arity) => (0..arity)
                .map(|_| self.read_u32())
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
        }
    }
}

struct Header {
    total_size: usize,
    num_props: usize,
    num_terms: usize,
    last_cycle: u32,
}

impl Header {
    fn read(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            total_size: reader.read_u32()? as usize,
            num_props: reader.read_u32()? as usize,
            num_terms: reader.read_u32()? as usize,
            last_cycle: reader.read_u32()?,
        })
    }
}

/// Deserialize a trace whose variables all hold scalar values.
pub fn decode(bytes: &[u8]) -> Result<Trace, CodecError> {
    let mut reader = Reader::new(bytes);
    let header = Header::read(&mut reader)?;
    let layout = vec![Width::Scalar; header.num_terms];

    decode_body(reader, header, &layout)
}

/// Deserialize a trace given the width of each variable slot.
pub fn decode_with_layout(bytes: &[u8], layout: &[Width]) -> Result<Trace, CodecError> {
    let mut reader = Reader::new(bytes);
    let header = Header::read(&mut reader)?;

    if header.num_terms != layout.len() {
        return Err(CodecError::SlotCountMismatch {
            header: header.num_terms,
            layout: layout.len(),
        });
    }

    decode_body(reader, header, layout)
}

fn decode_body(mut reader: Reader<'_>, header: Header, layout: &[Width]) -> Result<Trace, CodecError> {
    if header.total_size != reader.data.len() {
        return Err(CodecError::SizeMismatch {
            declared: header.total_size,
            actual: reader.data.len(),
        });
    }

    let cycles = header.last_cycle as usize + 1;
    let expected = total_size(header.num_props, layout, cycles)?;

    if expected != header.total_size {
        return Err(CodecError::LayoutMismatch {
            declared: header.total_size,
            expected,
        });
    }

    let mut trace = Trace::new(header.num_props, header.num_terms);

    for slot in 0..header.num_props {
        for cycle in 0..=header.last_cycle {
            let value = reader.read_bool()?;
            trace.try_update_prop_value(slot, cycle, value)?;
        }
    }

    for (slot, width) in layout.iter().enumerate() {
        for cycle in 0..=header.last_cycle {
            let value = reader.read_value(*width)?;
            trace.try_update_term_value(slot, cycle, value)?;
        }
    }

    trace.try_extend_to_cycle(header.last_cycle)?;

    debug!(
        props = header.num_props,
        terms = header.num_terms,
        cycles,
        "decoded trace"
    );

    Ok(trace)
}
