use super::models::{FileSelection, NewBillForm, PendingUpload, SelectedFile, SessionPhase};
use super::validation::validate_receipt_file;
use crate::features::bills::models::BillRecord;
use crate::features::navigation::{Navigator, Route};
use crate::shared::context::AppContext;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::store::{BillsResource, ReceiptUpload};
use log::{debug, error, info, warn};
use std::sync::{Arc, Mutex, MutexGuard};

/// ノート作成画面が提供する操作
pub trait NewBillView: Send + Sync {
    /// アラートを表示する
    fn alert(&self, message: &str);

    /// ファイル入力の値をクリアする
    fn clear_file_input(&self);
}

#[derive(Debug)]
struct SessionState {
    phase: SessionPhase,
    pending: PendingUpload,
    /// ファイル選択ごとに増加し、古いアップロード結果の破棄に使う
    generation: u64,
}

impl SessionState {
    /// 添付の有無に応じた待機フェーズ
    fn resting_phase(&self) -> SessionPhase {
        if self.pending.receipt().is_some() {
            SessionPhase::FileReady
        } else {
            SessionPhase::Idle
        }
    }
}

/// ノート作成画面のコントローラー
///
/// 1つのフォームセッションにつき1インスタンス。
/// 状態のロックは`.await`をまたいで保持しない。
pub struct NewBillController {
    context: AppContext,
    navigator: Arc<dyn Navigator>,
    view: Arc<dyn NewBillView>,
    state: Mutex<SessionState>,
}

impl NewBillController {
    pub fn new(
        context: AppContext,
        navigator: Arc<dyn Navigator>,
        view: Arc<dyn NewBillView>,
    ) -> Self {
        Self {
            context,
            navigator,
            view,
            state: Mutex::new(SessionState {
                phase: SessionPhase::Idle,
                pending: PendingUpload::default(),
                generation: 0,
            }),
        }
    }

    /// 現在のフェーズ
    pub fn phase(&self) -> SessionPhase {
        self.lock_state().phase
    }

    /// 保持しているアップロード情報
    pub fn pending(&self) -> PendingUpload {
        self.lock_state().pending.clone()
    }

    /// ファイル選択の処理
    ///
    /// 許可されていないファイルはアラートを表示して入力をクリアする。
    /// 許可されたファイルは直ちにアップロードし、結果をセッションに保持する。
    ///
    /// # 引数
    /// * `file` - 選択されたファイル
    ///
    /// # 戻り値
    /// 選択の結果。セッション終了後や新しい選択の後に完了したアップロードは`Discarded`
    ///
    /// # エラー
    /// ログインユーザーが不明な場合、またはアップロードに失敗した場合
    pub async fn on_file_selected(&self, file: SelectedFile) -> AppResult<FileSelection> {
        let content_type = match validate_receipt_file(&file, &self.context.receipt_policy) {
            Ok(content_type) => content_type,
            Err(e) => {
                debug!("許可されていないファイルが選択されました: name={}", file.name);
                self.view.alert(e.user_message());
                self.view.clear_file_input();
                return Ok(FileSelection::Rejected);
            }
        };

        let bills = self.bills_resource()?;
        let email = self.context.identity.current_email().map_err(|e| {
            error!("アップロードするユーザーを特定できません: {e}");
            e
        })?;

        let generation = {
            let mut state = self.lock_state();
            match state.phase {
                SessionPhase::Submitting => {
                    return Err(AppError::concurrency("Envoi de la note en cours"));
                }
                phase if phase.is_terminal() => {
                    return Err(AppError::concurrency("La saisie de la note est terminée"));
                }
                _ => {}
            }
            state.generation += 1;
            state.phase = SessionPhase::FileUploading;
            state.generation
        };

        let upload = ReceiptUpload {
            file_name: file.name,
            content_type,
            email,
            data: file.data,
        };
        let result = bills.upload(upload).await;

        let mut state = self.lock_state();
        if state.phase.is_terminal() || state.generation != generation {
            debug!(
                "古いアップロード結果を破棄します: generation={generation}, phase={:?}",
                state.phase
            );
            return Ok(FileSelection::Discarded);
        }

        match result {
            Ok(uploaded) => {
                state.pending = PendingUpload::from_uploaded(&uploaded);
                state.phase = SessionPhase::FileReady;
                info!(
                    "領収書を添付しました: file_name={}, bill_id={:?}",
                    uploaded.file_name, uploaded.id
                );
                Ok(FileSelection::Uploaded(uploaded))
            }
            Err(e) => {
                error!(
                    "領収書のアップロードに失敗しました: severity={:?}, {}",
                    e.severity(),
                    e.details()
                );
                state.phase = state.resting_phase();
                Err(e)
            }
        }
    }

    /// フォーム送信の処理
    ///
    /// アップロード時にノートが仮作成されていれば更新、そうでなければ作成し、
    /// 成功したらノート一覧へ遷移する。
    ///
    /// # 引数
    /// * `form` - 送信時点のフォーム入力値
    ///
    /// # 戻り値
    /// ストアが保存したノート
    ///
    /// # エラー
    /// アップロード中・送信中・セッション終了後の送信、またはストアの書き込み失敗
    pub async fn on_submit(&self, form: NewBillForm) -> AppResult<BillRecord> {
        let bills = self.bills_resource()?;
        let email = self.context.identity.current_email().map_err(|e| {
            error!("送信するユーザーを特定できません: {e}");
            e
        })?;

        let pending = {
            let mut state = self.lock_state();
            match state.phase {
                SessionPhase::FileUploading => {
                    warn!("領収書のアップロード中に送信されました");
                    return Err(AppError::concurrency(
                        "Téléversement du justificatif en cours",
                    ));
                }
                SessionPhase::Submitting => {
                    warn!("送信中に再度送信されました");
                    return Err(AppError::concurrency("Envoi de la note en cours"));
                }
                phase if phase.is_terminal() => {
                    return Err(AppError::concurrency("La saisie de la note est terminée"));
                }
                _ => {}
            }
            state.phase = SessionPhase::Submitting;
            state.pending.clone()
        };

        let candidate = form.to_candidate(&email, pending.receipt());
        let result = match pending.bill_id.as_deref() {
            Some(id) => {
                debug!("仮作成されたノートを更新します: id={id}");
                bills.update(id, candidate).await
            }
            None => bills.create(candidate).await,
        };

        match result {
            Ok(stored) => {
                {
                    let mut state = self.lock_state();
                    if state.phase == SessionPhase::Abandoned {
                        info!("送信完了前に画面を離れたため遷移しません");
                        return Ok(stored);
                    }
                    state.phase = SessionPhase::NavigatedAway;
                }
                info!("ノートを送信しました: id={:?}", stored.id);
                self.navigator.on_navigate(Route::Bills).await;
                Ok(stored)
            }
            Err(e) => {
                error!(
                    "ノートの送信に失敗しました: severity={:?}, {}",
                    e.severity(),
                    e.details()
                );
                let mut state = self.lock_state();
                if state.phase == SessionPhase::Submitting {
                    state.phase = state.resting_phase();
                }
                Err(e)
            }
        }
    }

    /// 画面を離れたときにセッションを終了する
    ///
    /// 以降に完了したアップロード結果は状態に反映されない
    pub fn abandon(&self) {
        let mut state = self.lock_state();
        if !state.phase.is_terminal() {
            debug!("ノート作成セッションを終了します: phase={:?}", state.phase);
            state.phase = SessionPhase::Abandoned;
        }
    }

    fn bills_resource(&self) -> AppResult<Arc<dyn BillsResource>> {
        self.context
            .store
            .as_ref()
            .map(|store| store.bills())
            .ok_or_else(|| AppError::configuration("ストアが設定されていません"))
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => {
                warn!("ノート作成セッションのロックが汚染されています。内容をそのまま使用します");
                poisoned.into_inner()
            }
        }
    }
}
