//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{RoomError, ValueObjectError};

/// ルーム操作のエラー
///
/// いずれも接続を切断する理由にはならず、UI 層で診断ログを出して破棄されます。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomOperationError {
    /// join 前にメンバーシップが必要な操作を受信した
    #[error("session has not joined a room")]
    NotJoined,

    /// 参加済みのセッションが再度 join した
    #[error("session already joined room '{0}'")]
    AlreadyJoined(String),

    /// 参加中のはずのルームがレジストリに存在しない
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    /// ドメインルール違反（容量超過、ストーリー未選択）
    #[error(transparent)]
    Room(#[from] RoomError),

    /// フィールドの検証エラー
    #[error(transparent)]
    InvalidField(#[from] ValueObjectError),
}
