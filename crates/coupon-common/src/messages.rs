//! Localized user-facing messages.
//!
//! Every string a client can see lives in this table, keyed by a stable code
//! and a [`Locale`]. Clients should branch on the HTTP status or the code,
//! never on the text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language used for response messages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Simplified Chinese
    #[default]
    Zh,
    /// Japanese
    Ja,
    /// English
    En,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zh" | "zh-cn" => Ok(Self::Zh),
            "ja" | "ja-jp" => Ok(Self::Ja),
            "en" | "en-us" => Ok(Self::En),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Zh => "zh",
            Self::Ja => "ja",
            Self::En => "en",
        })
    }
}

/// Error codes sent alongside `errorMessage`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidNumber,
    InvalidExpiry,
    InvalidPassCode,
    InvalidSerialNumber,
    MalformedRequest,
    UnknownSerialNumber,
    IncorrectPassCode,
    IssueFailed,
    RedeemFailed,
}

impl ErrorCode {
    pub fn message(self, locale: Locale) -> &'static str {
        use ErrorCode::*;
        use Locale::*;

        match (self, locale) {
            (InvalidNumber, Zh) => "次数应至少为 1 次且不超过 99999 次",
            (InvalidNumber, Ja) => "回数は1回以上99999回以下で入力してください",
            (InvalidNumber, En) => "Usage count must be between 1 and 99999",

            (InvalidExpiry, Zh) => "请以 yyyy-mm-dd 格式输入有效期",
            (InvalidExpiry, Ja) => "有効期限は yyyy-mm-dd 形式で入力してください",
            (InvalidExpiry, En) => "Enter the expiry date as yyyy-mm-dd",

            (InvalidPassCode, Zh) => "以 5 位数字的形式输入您的密码",
            (InvalidPassCode, Ja) => "パスコードは5桁の数字で入力してください",
            (InvalidPassCode, En) => "Passcode must be 5 digits",

            (InvalidSerialNumber, Zh) => "序列号必须是 12 位数字",
            (InvalidSerialNumber, Ja) => "シリアル番号は12桁の数字で入力してください",
            (InvalidSerialNumber, En) => "Serial number must be 12 digits",

            (MalformedRequest, Zh) => "请求格式无效",
            (MalformedRequest, Ja) => "リクエストの形式が正しくありません",
            (MalformedRequest, En) => "Malformed request body",

            (UnknownSerialNumber, Zh) => "序列号无效",
            (UnknownSerialNumber, Ja) => "シリアル番号が無効です",
            (UnknownSerialNumber, En) => "Invalid serial number",

            (IncorrectPassCode, Zh) => "密码错误",
            (IncorrectPassCode, Ja) => "パスコードが違います",
            (IncorrectPassCode, En) => "Incorrect passcode",

            (IssueFailed, Zh) => "由于某种原因无法发行",
            (IssueFailed, Ja) => "何らかの理由で発行できませんでした",
            (IssueFailed, En) => "The coupon could not be issued",

            (RedeemFailed, Zh) => "由于某种原因导致验证失败",
            (RedeemFailed, Ja) => "何らかの理由で検証に失敗しました",
            (RedeemFailed, En) => "The coupon could not be verified",
        }
    }
}

/// Informational outcomes of a redemption (all HTTP 200)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoticeCode {
    Redeemed,
    AlreadyUsed,
    Expired,
}

impl NoticeCode {
    /// Message template; `{number}` is replaced with the usage count
    fn template(self, locale: Locale) -> &'static str {
        use Locale::*;
        use NoticeCode::*;

        match (self, locale) {
            (Redeemed, Zh) => "{number}本券已成功使用",
            (Redeemed, Ja) => "{number}回分のクーポンを使用しました",
            (Redeemed, En) => "Coupon for {number} redeemed successfully",

            (AlreadyUsed, Zh) => "此券已使用",
            (AlreadyUsed, Ja) => "このクーポンは使用済みです",
            (AlreadyUsed, En) => "This coupon has already been used",

            (Expired, Zh) => "此券已过期",
            (Expired, Ja) => "このクーポンは有効期限切れです",
            (Expired, En) => "This coupon has expired",
        }
    }

    pub fn render(self, locale: Locale, number: u32) -> String {
        self.template(locale).replace("{number}", &number.to_string())
    }
}
