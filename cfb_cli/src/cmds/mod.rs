pub mod analyze;
pub mod generate;

use cfb_gen::TrailingPadding;

pub fn trailing_mode(no_trailing_padding: bool) -> TrailingPadding {
    if no_trailing_padding {
        TrailingPadding::None
    } else {
        TrailingPadding::ToByteSize
    }
}
