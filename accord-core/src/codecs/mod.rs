//! Built-in content types.
//!
//! | Codec              | Media types                                              | Payloads                         |
//! |--------------------|----------------------------------------------------------|----------------------------------|
//! | [`Json`]           | `application/json`, `application/json;charset=utf-8`     | `T: Serialize + DeserializeOwned`|
//! | [`PlainText`]      | `text/plain;charset=utf-8`                               | `String`, `Cow<'static, str>`    |
//! | [`OctetStream`]    | `application/octet-stream`                               | `Bytes`, `Vec<u8>`               |
//! | [`FormUrlEncoded`] | `application/x-www-form-urlencoded`                      | `T: Serialize + DeserializeOwned`|
//!
//! Every codec also renders [`NoContent`](crate::codec::NoContent) as an
//! empty body.

mod form;
mod json;
mod octet;
mod text;

pub use form::FormUrlEncoded;
pub use json::Json;
pub use octet::OctetStream;
pub use text::PlainText;
