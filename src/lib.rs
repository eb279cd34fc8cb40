//! Asset catalog fetcher.
//!
//! Downloads a manifest of images into an Xcode `Assets.xcassets` tree and writes the
//! `Contents.json` descriptors the asset catalog expects.

pub mod fetcher;
