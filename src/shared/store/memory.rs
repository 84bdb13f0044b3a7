/// インメモリストア
///
/// 開発・テスト用のストア実装です。フィクスチャのノートを保持し、
/// 擬似的な遅延と操作ごとの失敗注入をサポートします。
use super::{BillsResource, ReceiptUpload, Store, UploadedReceipt};
use crate::features::bills::models::{BillRecord, BillStatus, ReceiptRef};
use crate::shared::config::environment::StoreConfig;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::nanoid::{generate_bill_id, generate_file_key};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

/// 領収書URLのベース
const RECEIPT_BASE_URL: &str = "https://localhost:3456/images";

/// ストア操作の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    List,
    Create,
    Update,
    Upload,
}

#[derive(Default)]
struct MemoryState {
    bills: Vec<BillRecord>,
    failures: HashMap<StoreOperation, VecDeque<AppError>>,
    calls: HashMap<StoreOperation, usize>,
}

struct MemoryBills {
    state: Mutex<MemoryState>,
    config: StoreConfig,
    allocate_on_upload: bool,
}

/// インメモリストア
///
/// クローンしたインスタンスは同じデータを共有する
#[derive(Clone)]
pub struct InMemoryStore {
    inner: Arc<MemoryBills>,
}

impl InMemoryStore {
    /// 空のストアを作成する
    pub fn new() -> Self {
        Self::with_bills(Vec::new())
    }

    /// 指定したノートを保持するストアを作成する
    pub fn with_bills(bills: Vec<BillRecord>) -> Self {
        Self::with_config(bills, StoreConfig::default())
    }

    /// フィクスチャのノートを保持するストアを作成する
    pub fn with_fixtures() -> Self {
        Self::with_bills(fixture_bills())
    }

    /// 設定を指定してストアを作成する
    pub fn with_config(bills: Vec<BillRecord>, config: StoreConfig) -> Self {
        Self {
            inner: Arc::new(MemoryBills {
                state: Mutex::new(MemoryState {
                    bills,
                    ..MemoryState::default()
                }),
                config,
                allocate_on_upload: true,
            }),
        }
    }

    /// アップロード時にノートを仮作成しないストアに切り替える
    ///
    /// 共有前（クローン前）に呼び出すこと
    pub fn without_upload_allocation(self) -> Self {
        let config = self.inner.config.clone();
        let bills = self.bills_snapshot();
        Self {
            inner: Arc::new(MemoryBills {
                state: Mutex::new(MemoryState {
                    bills,
                    ..MemoryState::default()
                }),
                config,
                allocate_on_upload: false,
            }),
        }
    }

    /// 次回の操作を指定したエラーで失敗させる
    pub fn fail_next(&self, operation: StoreOperation, error: AppError) {
        let mut state = self.inner.lock_state();
        state.failures.entry(operation).or_default().push_back(error);
    }

    /// 操作の呼び出し回数を取得する
    pub fn calls(&self, operation: StoreOperation) -> usize {
        self.inner
            .lock_state()
            .calls
            .get(&operation)
            .copied()
            .unwrap_or(0)
    }

    /// 保持しているノートのコピーを取得する
    pub fn bills_snapshot(&self) -> Vec<BillRecord> {
        self.inner.lock_state().bills.clone()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for InMemoryStore {
    fn bills(&self) -> Arc<dyn BillsResource> {
        self.inner.clone()
    }
}

impl MemoryBills {
    fn lock_state(&self) -> MutexGuard<'_, MemoryState> {
        match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => {
                warn!("インメモリストアのロックが汚染されています。内容をそのまま使用します");
                poisoned.into_inner()
            }
        }
    }

    /// 擬似遅延の後、呼び出しを記録し、注入された失敗があれば返す
    async fn begin(&self, operation: StoreOperation) -> AppResult<()> {
        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }

        let mut state = self.lock_state();
        *state.calls.entry(operation).or_insert(0) += 1;
        if let Some(error) = state
            .failures
            .get_mut(&operation)
            .and_then(|queue| queue.pop_front())
        {
            warn!("注入された失敗を返します: operation={operation:?}, error={error}");
            return Err(error);
        }
        Ok(())
    }
}

fn ensure_consistent_receipt(bill: &BillRecord) -> AppResult<()> {
    if bill.has_consistent_receipt() {
        Ok(())
    } else {
        Err(AppError::validation(
            "fileUrl と fileName は同時に設定する必要があります",
        ))
    }
}

#[async_trait]
impl BillsResource for MemoryBills {
    async fn list(&self) -> AppResult<Vec<BillRecord>> {
        self.begin(StoreOperation::List).await?;
        let bills = self.lock_state().bills.clone();
        debug!("ノート一覧を返します: count={}", bills.len());
        Ok(bills)
    }

    async fn create(&self, mut bill: BillRecord) -> AppResult<BillRecord> {
        self.begin(StoreOperation::Create).await?;
        ensure_consistent_receipt(&bill)?;

        let id = generate_bill_id();
        bill.id = Some(id.clone());
        self.lock_state().bills.push(bill.clone());

        info!("ノートを作成しました: id={id}");
        Ok(bill)
    }

    async fn update(&self, id: &str, mut bill: BillRecord) -> AppResult<BillRecord> {
        self.begin(StoreOperation::Update).await?;
        ensure_consistent_receipt(&bill)?;

        let mut state = self.lock_state();
        let existing = state
            .bills
            .iter_mut()
            .find(|b| b.id.as_deref() == Some(id))
            .ok_or_else(|| AppError::not_found(format!("ノート {id}")))?;

        // IDは作成後に変更しない
        bill.id = Some(id.to_string());
        *existing = bill.clone();

        info!("ノートを更新しました: id={id}");
        Ok(bill)
    }

    async fn upload(&self, receipt: ReceiptUpload) -> AppResult<UploadedReceipt> {
        self.begin(StoreOperation::Upload).await?;

        if receipt.data.is_empty() {
            return Err(AppError::validation("Fichier vide"));
        }

        let file_url = format!(
            "{RECEIPT_BASE_URL}/{}/{}",
            generate_file_key(10),
            receipt.file_name
        );

        let id = if self.allocate_on_upload {
            let id = generate_bill_id();
            let mut placeholder = BillRecord {
                id: Some(id.clone()),
                email: receipt.email.clone(),
                expense_type: String::new(),
                name: String::new(),
                amount: None,
                date: String::new(),
                vat: String::new(),
                pct: None,
                commentary: None,
                file_url: None,
                file_name: None,
                status: BillStatus::Pending.to_string(),
            };
            placeholder.set_receipt(Some(ReceiptRef {
                file_url: file_url.clone(),
                file_name: receipt.file_name.clone(),
            }));
            self.lock_state().bills.push(placeholder);
            Some(id)
        } else {
            None
        };

        info!(
            "領収書をアップロードしました: file_name={}, size={} bytes, content_type={}",
            receipt.file_name,
            receipt.data.len(),
            receipt.content_type
        );

        Ok(UploadedReceipt {
            file_url,
            file_name: receipt.file_name,
            id,
        })
    }
}

/// 開発・テスト用のフィクスチャ
pub fn fixture_bills() -> Vec<BillRecord> {
    #[allow(clippy::too_many_arguments)]
    fn bill(
        id: &str,
        expense_type: &str,
        name: &str,
        amount: i64,
        date: &str,
        vat: &str,
        commentary: &str,
        file_name: &str,
        status: BillStatus,
    ) -> BillRecord {
        BillRecord {
            id: Some(id.to_string()),
            email: "a@a".to_string(),
            expense_type: expense_type.to_string(),
            name: name.to_string(),
            amount: Some(amount),
            date: date.to_string(),
            vat: vat.to_string(),
            pct: Some(20),
            commentary: Some(commentary.to_string()),
            file_url: Some(format!("https://test.storage.tld/v0/b/billable/{file_name}")),
            file_name: Some(file_name.to_string()),
            status: status.to_string(),
        }
    }

    vec![
        bill(
            "47qAXb6fIm2zOKkLzMro",
            "Hôtel et logement",
            "encore",
            400,
            "2004-04-04",
            "80",
            "séminaire billed",
            "preview-facture-free-201801-pdf-1.jpg",
            BillStatus::Pending,
        ),
        bill(
            "BeKy5Mo4jkmdfPGYpTxZ",
            "Transports",
            "test1",
            100,
            "2001-01-01",
            "",
            "plop",
            "1592770761.jpeg",
            BillStatus::Refused,
        ),
        bill(
            "UIUZtnPQvnbFnB0ozvJh",
            "Services en ligne",
            "test3",
            300,
            "2003-03-03",
            "60",
            "",
            "facture-client-php-exportee-dans-document-pdf-enregistre-sur-disque-dur.png",
            BillStatus::Accepted,
        ),
        bill(
            "qcCK3SzECmaZAGRrHjaC",
            "Restaurants et bars",
            "test2",
            200,
            "2002-02-02",
            "40",
            "test2",
            "preview-facture-free-201801-pdf-1.jpg",
            BillStatus::Refused,
        ),
    ]
}
