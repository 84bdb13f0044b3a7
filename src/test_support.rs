//! テスト用の共通ヘルパー

use crate::features::navigation::{Navigator, Route};
use crate::features::new_bill::NewBillView;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::format::RecordFormatter;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

/// 遷移先を記録するナビゲーター
#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }
}

#[async_trait]
impl Navigator for RecordingNavigator {
    async fn on_navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

/// "formatted-" を付けるだけの書式変換（指定した日付では失敗する）
#[derive(Default)]
pub struct PrefixFormatter {
    failing_dates: HashSet<String>,
}

impl PrefixFormatter {
    pub fn failing_on(dates: &[&str]) -> Self {
        Self {
            failing_dates: dates.iter().map(|d| d.to_string()).collect(),
        }
    }
}

impl RecordFormatter for PrefixFormatter {
    fn format_date(&self, raw: &str) -> AppResult<String> {
        if self.failing_dates.contains(raw) {
            return Err(AppError::format("Format date failed"));
        }
        Ok(format!("formatted-{raw}"))
    }

    fn format_status(&self, raw: &str) -> String {
        format!("formatted-{raw}")
    }
}

/// アラートとファイル入力のクリアを記録する画面
#[derive(Default)]
pub struct RecordingView {
    alerts: Mutex<Vec<String>>,
    cleared: Mutex<usize>,
}

impl RecordingView {
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn cleared_count(&self) -> usize {
        *self.cleared.lock().unwrap()
    }
}

impl NewBillView for RecordingView {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }

    fn clear_file_input(&self) {
        *self.cleared.lock().unwrap() += 1;
    }
}
