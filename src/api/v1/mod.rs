//
//  bitbucket-cloud
//  api/v1/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/30.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Bitbucket Cloud API v1.0 resources.
//!
//! The 1.0 API predates the hypermedia conventions of 2.0: payloads carry
//! no links section, list endpoints answer with bare JSON arrays instead
//! of page envelopes, and write endpoints expect URL-encoded forms rather
//! than JSON bodies. The resources here compensate with static link
//! catalogs shipped in the library.
//!
//! Only OAuth consumers remain on 1.0; see [`consumers`].

pub mod consumers;

pub use consumers::{Consumer, ConsumerPayload, PermissionScope};
