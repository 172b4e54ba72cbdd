use crate::error::{LayoutError, LayoutResult};
use crate::layout::resolver::LayoutResolver;
use cfb_schema::{Field, Object};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillerWidth {
  U8,
  U16,
  U32,
  U64,
}

impl FillerWidth {
  pub fn bytes(self) -> u64 {
    match self {
      FillerWidth::U8 => 1,
      FillerWidth::U16 => 2,
      FillerWidth::U32 => 4,
      FillerWidth::U64 => 8,
    }
  }

  pub fn type_name(self) -> &'static str {
    match self {
      FillerWidth::U8 => "u8",
      FillerWidth::U16 => "u16",
      FillerWidth::U32 => "u32",
      FillerWidth::U64 => "u64",
    }
  }
}

/* Synthetic zero field emitted as `padding{index}_` */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filler {
  pub index: usize,
  pub width: FillerWidth,
}

impl Filler {
  pub fn name(&self) -> String {
    format!("padding{}_", self.index)
  }
}

/* A real struct field and the fillers that precede it */
#[derive(Debug, Clone, PartialEq)]
pub struct PaddedField<'a> {
  pub field: &'a Field,
  pub fillers: Vec<Filler>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructLayout<'a> {
  pub fields: Vec<PaddedField<'a>>,
  pub trailing: Vec<Filler>,
}

impl StructLayout<'_> {
  pub fn filler_count(&self) -> usize {
    self.fields.iter().map(|f| f.fillers.len()).sum::<usize>() + self.trailing.len()
  }

  /* Every filler in emission order */
  pub fn fillers(&self) -> impl Iterator<Item = &Filler> {
    self.fields.iter().flat_map(|f| f.fillers.iter()).chain(self.trailing.iter())
  }
}

/* What happens after the last field of a struct */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrailingPadding {
  /* Stop right after the last field */
  None,
  /* Pad up to the declared bytesize so vector strides match */
  #[default]
  ToByteSize,
}

pub fn round_up(position: u64, alignment: u64) -> u64 {
  if alignment == 0 || position % alignment == 0 {
    position
  } else {
    (position / alignment + 1) * alignment
  }
}

/* Split a gap into at most one u8, one u16, one u32, then u64s */
pub fn fillers_for_gap(start_index: usize, gap: u64) -> Vec<Filler> {
  let mut fillers = Vec::new();
  let mut remaining = gap;
  let mut index = start_index;
  let mut push = |width: FillerWidth, fillers: &mut Vec<Filler>| {
    fillers.push(Filler { index, width });
    index += 1;
  };

  if remaining % 2 == 1 {
    push(FillerWidth::U8, &mut fillers);
    remaining -= 1;
  }
  if remaining % 4 == 2 {
    push(FillerWidth::U16, &mut fillers);
    remaining -= 2;
  }
  if remaining % 8 == 4 {
    push(FillerWidth::U32, &mut fillers);
    remaining -= 4;
  }
  for _ in 0..remaining / 8 {
    push(FillerWidth::U64, &mut fillers);
  }
  fillers
}

pub fn pad_struct<'a>(
  resolver: &LayoutResolver<'_>,
  object: &'a Object,
  trailing: TrailingPadding,
) -> LayoutResult<StructLayout<'a>> {
  if !object.is_struct {
    return Err(LayoutError::NotAStruct { record: object.name.clone() });
  }

  let mut position = 0u64;
  let mut filler_index = 0usize;
  let mut fields = Vec::with_capacity(object.fields.len());

  for field in resolver.fields_by_offset(object) {
    let aligned = round_up(position, resolver.alignment_of(field)?);
    if aligned != u64::from(field.offset) {
      return Err(LayoutError::OffsetMismatch {
        record: object.name.clone(),
        field: field.name.clone(),
        declared: u64::from(field.offset),
        computed: aligned,
      });
    }

    let fillers = fillers_for_gap(filler_index, aligned - position);
    filler_index += fillers.len();
    position = aligned + resolver.size_of(field)?;
    fields.push(PaddedField { field, fillers });
  }

  let trailing = match trailing {
    TrailingPadding::None => Vec::new(),
    TrailingPadding::ToByteSize => {
      let declared = object.byte_size();
      let end = if declared >= position {
        declared
      } else {
        round_up(position, resolver.record_alignment(object)?)
      };
      fillers_for_gap(filler_index, end - position)
    }
  };

  debug!(
    record = %object.name,
    fields = fields.len(),
    fillers = filler_index + trailing.len(),
    "padded struct"
  );

  Ok(StructLayout { fields, trailing })
}
