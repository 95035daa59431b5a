// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request interception
//!
//! Hooks that observe, rewrite or cancel requests before they are sent.

mod interceptor;

pub use interceptor::{
    HostBlocker, InterceptAction, InterceptorChain, RequestInterceptor, RequestLogger,
};
