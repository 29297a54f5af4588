//! # Config Service ライブラリ
//!
//! 国別設定サービスのコアモジュール。
//!
//! ## モジュール構成
//!
//! - `app_builder`: ルーター構築
//! - `config`: 環境変数からの設定読み込み
//! - `error`: エラーと HTTP レスポンスへの変換
//! - `extract`: JSON ボディの取り出しと検証
//! - `handler`: HTTP ハンドラ
//! - `usecase`: 通知のテンプレート解決・レンダリング・送信

pub mod app_builder;
pub mod config;
pub mod error;
pub mod extract;
pub mod handler;
pub mod usecase;
