//! Encapsulated pixel data.

use crate::reader::Reader;
use crate::tag::Tag;

const ITEM_HEADER_LEN: usize = 8;

/// Return the first fragment of the encapsulated pixel data starting at
/// `offset`.
///
/// The first item is the basic offset table and is skipped. Returns `None` if
/// no fragment item follows it, or if the fragment is empty. A fragment whose
/// declared length runs past the end of the data is cut short.
pub fn extract_frame(data: &[u8], offset: usize) -> Option<&[u8]> {
    let mut r = Reader::new(data);
    r.jump(offset);

    if let Some(table_len) = item_length(&r) {
        let next = r
            .offset()
            .checked_add(ITEM_HEADER_LEN)?
            .checked_add(table_len as usize)?;
        r.jump(next);
    }

    let len = item_length(&r)? as usize;
    r.skip_bytes(ITEM_HEADER_LEN)?;

    let start = r.offset();
    let end = start.saturating_add(len).min(data.len());
    let fragment = data.get(start..end)?;

    (!fragment.is_empty()).then_some(fragment)
}

/// The length of the item at the current position, if there is one.
fn item_length(r: &Reader<'_>) -> Option<u32> {
    let mut r = r.clone();
    let tag = Tag(r.read_u16()?, r.read_u16()?);
    let len = r.read_u32()?;

    (tag == Tag::ITEM).then_some(len)
}
