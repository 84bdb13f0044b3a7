use super::models::{BillRecord, DisplayBillRecord};
use crate::features::navigation::{Navigator, Route};
use crate::shared::context::AppContext;
use crate::shared::errors::AppResult;
use crate::shared::format::RecordFormatter;
use log::{debug, info, warn};
use std::sync::Arc;

/// 従業員のノート一覧画面のコントローラー
pub struct BillsController {
    context: AppContext,
    navigator: Arc<dyn Navigator>,
}

impl BillsController {
    pub fn new(context: AppContext, navigator: Arc<dyn Navigator>) -> Self {
        Self { context, navigator }
    }

    /// 「新しいノート」ボタンの処理
    pub async fn handle_click_new_bill(&self) {
        debug!("ノート作成画面へ遷移します");
        self.navigator.on_navigate(Route::NewBill).await;
    }

    /// 表示用に書式変換したノート一覧を取得する
    ///
    /// # 戻り値
    /// ストア未設定の場合は`Ok(None)`、それ以外はストアと同じ順序・件数の一覧
    ///
    /// # エラー
    /// ストアの一覧取得に失敗した場合はそのエラーをそのまま返す
    pub async fn fetch_display_bills(&self) -> AppResult<Option<Vec<DisplayBillRecord>>> {
        let Some(store) = self.context.store.as_ref() else {
            debug!("ストアが設定されていないため一覧取得をスキップします");
            return Ok(None);
        };

        let bills = store.bills().list().await?;
        let formatter = self.context.formatter.as_ref();
        let display: Vec<DisplayBillRecord> = bills
            .into_iter()
            .map(|bill| to_display_bill(formatter, bill))
            .collect();

        info!("ノート一覧を取得しました: count={}", display.len());
        Ok(Some(display))
    }
}

/// ノートを表示用に変換する
///
/// 日付の書式変換に失敗した場合は元の値を残し、他のノートの変換は継続する
pub fn to_display_bill(formatter: &dyn RecordFormatter, bill: BillRecord) -> DisplayBillRecord {
    let sort_key = bill.date.clone();
    let date = match formatter.format_date(&bill.date) {
        Ok(formatted) => formatted,
        Err(e) => {
            warn!(
                "日付の書式変換に失敗しました。元の値を使用します: id={:?}, date={}, error={e}",
                bill.id, bill.date
            );
            bill.date.clone()
        }
    };
    let status = formatter.format_status(&bill.status);

    DisplayBillRecord {
        bill: BillRecord {
            date,
            status,
            ..bill
        },
        sort_key,
    }
}
