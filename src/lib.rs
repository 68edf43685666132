#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use mc_copy as copy;
pub use mc_mapper as mapper;
pub use mc_utils as utils;
