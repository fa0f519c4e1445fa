//! # Text Segmentation
//!
//! Cuts text into the units the merge engine works on:
//! ordinary pieces, and the special tokens between them.

mod text_segmentor;

#[doc(inline)]
pub use text_segmentor::TextSegmentor;
