mod client;

pub(crate) use client::{Builder, HttpsClient};
