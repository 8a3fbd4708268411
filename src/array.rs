//! Text encodings of the numeric payloads stored inside `DataArray` elements

use crate::parse::error::ArrayPayload;
use crate::store::Encoding;

use std::str::FromStr;

/// a value type that can live inside a `DataArray`
pub(crate) trait Numeric: Copy + FromStr + num_traits::Zero {
    /// value of the `type` attribute
    const TYPE_NAME: &'static str;

    /// width in bytes of a single value in the binary encoding
    const SIZE: usize;

    fn extend_le_bytes(self, bytes: &mut Vec<u8>);

    /// `bytes` is exactly `SIZE` long
    fn from_le_slice(bytes: &[u8]) -> Self;

    fn push_ascii(self, text: &mut String);
}

impl Numeric for f64 {
    const TYPE_NAME: &'static str = "Float64";
    const SIZE: usize = 8;

    fn extend_le_bytes(self, bytes: &mut Vec<u8>) {
        bytes.extend_from_slice(&self.to_le_bytes());
    }

    fn from_le_slice(bytes: &[u8]) -> Self {
        let mut const_slice = [0; 8];
        const_slice.copy_from_slice(bytes);
        f64::from_le_bytes(const_slice)
    }

    fn push_ascii(self, text: &mut String) {
        let mut buffer = ryu::Buffer::new();
        text.push_str(buffer.format(self));
    }
}

impl Numeric for i32 {
    const TYPE_NAME: &'static str = "Int32";
    const SIZE: usize = 4;

    fn extend_le_bytes(self, bytes: &mut Vec<u8>) {
        bytes.extend_from_slice(&self.to_le_bytes());
    }

    fn from_le_slice(bytes: &[u8]) -> Self {
        let mut const_slice = [0; 4];
        const_slice.copy_from_slice(bytes);
        i32::from_le_bytes(const_slice)
    }

    fn push_ascii(self, text: &mut String) {
        text.push_str(&self.to_string());
    }
}

/// encode `values` as the body text of a `DataArray`
pub(crate) fn encode<T: Numeric>(values: &[T], encoding: Encoding) -> String {
    match encoding {
        Encoding::Ascii => {
            let mut text = String::with_capacity(values.len() * 8);
            for (idx, value) in values.iter().enumerate() {
                if idx > 0 {
                    text.push(' ');
                }
                value.push_ascii(&mut text);
            }
            text
        }
        Encoding::Base64 => {
            let payload_len = values.len() * T::SIZE;
            let mut byte_data: Vec<u8> = Vec::with_capacity(payload_len + 8);

            // the payload is prefixed with its own length in bytes
            byte_data.extend_from_slice(&(payload_len as u64).to_le_bytes());
            values
                .iter()
                .for_each(|value| value.extend_le_bytes(&mut byte_data));

            base64::encode(&byte_data)
        }
    }
}

/// decode the body text of a `DataArray`, the inverse of [`encode`]
pub(crate) fn decode<T: Numeric>(
    text: &str,
    encoding: Encoding,
    array_name: &str,
) -> Result<Vec<T>, ArrayPayload> {
    match encoding {
        Encoding::Ascii => text
            .split_ascii_whitespace()
            .map(|number| {
                number.parse().map_err(|_| ArrayPayload::AsciiNumber {
                    array_name: array_name.into(),
                    number: number.into(),
                })
            })
            .collect(),
        Encoding::Base64 => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(Vec::new());
            }

            let bytes = base64::decode(text).map_err(|source| ArrayPayload::Base64 {
                array_name: array_name.into(),
                source,
            })?;

            let (header, payload) = if bytes.len() >= 8 {
                bytes.split_at(8)
            } else {
                return Err(ArrayPayload::ByteCount {
                    array_name: array_name.into(),
                    declared: 0,
                    actual: bytes.len(),
                });
            };

            let mut header_bytes = [0; 8];
            header_bytes.copy_from_slice(header);
            let declared = u64::from_le_bytes(header_bytes);

            if declared != payload.len() as u64 || payload.len() % T::SIZE != 0 {
                return Err(ArrayPayload::ByteCount {
                    array_name: array_name.into(),
                    declared,
                    actual: payload.len(),
                });
            }

            Ok(payload.chunks_exact(T::SIZE).map(T::from_le_slice).collect())
        }
    }
}
