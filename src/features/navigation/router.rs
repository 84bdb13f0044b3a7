use super::routes::Route;
use super::views;
use super::Navigator;
use crate::features::bills::controller::BillsController;
use crate::features::new_bill::controller::{NewBillController, NewBillView};
use crate::shared::context::AppContext;
use async_trait::async_trait;
use log::{debug, info, log, warn};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!("ルーターのロックが汚染されています。内容をそのまま使用します");
            poisoned.into_inner()
        }
    }
}

/// 画面領域
///
/// 現在のHTMLと、ノート作成画面が発生させたアラート・入力クリアを保持する
#[derive(Debug, Default)]
pub struct ViewRegion {
    html: Mutex<String>,
    alerts: Mutex<Vec<String>>,
    file_input_clears: Mutex<usize>,
}

impl ViewRegion {
    pub fn html(&self) -> String {
        lock(&self.html).clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        lock(&self.alerts).clone()
    }

    pub fn file_input_clears(&self) -> usize {
        *lock(&self.file_input_clears)
    }

    fn render(&self, html: String) {
        *lock(&self.html) = html;
    }
}

impl NewBillView for ViewRegion {
    fn alert(&self, message: &str) {
        info!("アラートを表示します: {message}");
        lock(&self.alerts).push(message.to_string());
    }

    fn clear_file_input(&self) {
        *lock(&self.file_input_clears) += 1;
    }
}

#[derive(Default)]
struct RouterState {
    route: Option<Route>,
    /// 遷移ごとに増加し、遅れて完了した描画の破棄に使う
    navigation: u64,
    new_bill: Option<Arc<NewBillController>>,
}

/// 画面領域とコントローラーを結び付けるルーター
pub struct Router {
    context: AppContext,
    region: Arc<ViewRegion>,
    state: Mutex<RouterState>,
    me: Weak<Router>,
}

impl Router {
    pub fn new(context: AppContext) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            context,
            region: Arc::new(ViewRegion::default()),
            state: Mutex::new(RouterState::default()),
            me: me.clone(),
        })
    }

    /// コントローラーへ渡すナビゲーター
    ///
    /// ルーターへの弱参照のみを保持する
    pub fn navigator(&self) -> Arc<dyn Navigator> {
        Arc::new(RouterNavigator(self.me.clone()))
    }

    pub fn region(&self) -> Arc<ViewRegion> {
        self.region.clone()
    }

    pub fn current_html(&self) -> String {
        self.region.html()
    }

    pub fn current_route(&self) -> Option<Route> {
        lock(&self.state).route
    }

    pub fn alerts(&self) -> Vec<String> {
        self.region.alerts()
    }

    /// 表示中のノート作成セッション
    pub fn new_bill_session(&self) -> Option<Arc<NewBillController>> {
        lock(&self.state).new_bill.clone()
    }

    /// ノート一覧画面のコントローラー
    pub fn bills_controller(&self) -> BillsController {
        BillsController::new(self.context.clone(), self.navigator())
    }

    /// パスで指定した画面へ遷移する
    ///
    /// 不明なパスはログイン画面として扱う
    pub async fn navigate_to_path(&self, path: &str) {
        let route = Route::from_path(path).unwrap_or_else(|| {
            warn!("不明なパスです。ログイン画面へ遷移します: path={path}");
            Route::Login
        });
        self.navigate(route).await;
    }

    /// 指定した画面へ遷移して描画する
    ///
    /// 表示中のノート作成セッションは終了する。
    /// 従業員としてログインしていない場合、従業員向けの画面はログイン画面へ切り替える。
    pub async fn navigate(&self, route: Route) {
        let route = if route.requires_employee() && !self.is_employee_logged_in() {
            info!("従業員としてログインしていないため、ログイン画面へ遷移します: requested={route}");
            Route::Login
        } else {
            route
        };

        let (navigation, previous_session) = {
            let mut state = lock(&self.state);
            state.navigation += 1;
            state.route = Some(route);
            (state.navigation, state.new_bill.take())
        };
        if let Some(session) = previous_session {
            session.abandon();
        }
        debug!("画面を切り替えます: route={route}, navigation={navigation}");

        match route {
            Route::Bills => self.render_bills(navigation).await,
            Route::NewBill => self.render_new_bill(navigation),
            Route::Login | Route::Dashboard => self.region.render(views::placeholder_page(route)),
        }
    }

    fn is_employee_logged_in(&self) -> bool {
        self.context
            .identity
            .current_user()
            .map(|user| user.is_employee())
            .unwrap_or(false)
    }

    fn is_current(&self, navigation: u64) -> bool {
        lock(&self.state).navigation == navigation
    }

    async fn render_bills(&self, navigation: u64) {
        self.region.render(views::loading_page(Route::Bills));

        let result = self.bills_controller().fetch_display_bills().await;
        if !self.is_current(navigation) {
            debug!("別の画面へ遷移したため一覧の描画を破棄します");
            return;
        }

        let html = match result {
            Ok(Some(bills)) => views::bills_page(&bills),
            Ok(None) => views::bills_page(&[]),
            Err(e) => {
                log!(
                    e.log_level(),
                    "ノート一覧の取得に失敗しました: severity={:?}, {}",
                    e.severity(),
                    e.details()
                );
                views::error_page(Route::Bills, &e)
            }
        };
        self.region.render(html);
    }

    fn render_new_bill(&self, navigation: u64) {
        let view: Arc<dyn NewBillView> = self.region.clone();
        let session = Arc::new(NewBillController::new(
            self.context.clone(),
            self.navigator(),
            view,
        ));

        let mut state = lock(&self.state);
        if state.navigation != navigation {
            session.abandon();
            return;
        }
        state.new_bill = Some(session);
        drop(state);

        self.region.render(views::new_bill_page());
    }
}

/// ルーターへの弱参照を持つナビゲーター
pub struct RouterNavigator(Weak<Router>);

#[async_trait]
impl Navigator for RouterNavigator {
    async fn on_navigate(&self, route: Route) {
        match self.0.upgrade() {
            Some(router) => router.navigate(route).await,
            None => warn!("ルーターが破棄されているため遷移できません: route={route}"),
        }
    }
}
