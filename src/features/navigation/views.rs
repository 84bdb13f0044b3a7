/// 画面のHTML生成
///
/// 画面領域に描画する文字列を組み立てる純粋関数群です。
/// 利用者が入力した値は必ず`escape_html`を通します。
use super::routes::Route;
use crate::features::bills::models::DisplayBillRecord;
use crate::shared::errors::AppError;

/// HTMLの特殊文字をエスケープする
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// 縦型ナビゲーション（アクティブなアイコンに`active-icon`を付ける）
pub fn vertical_layout(active: Route) -> String {
    let class_for = |route: Route| {
        if route == active {
            " class=\"active-icon\""
        } else {
            ""
        }
    };

    format!(
        "<div class=\"vertical-navbar\">\
         <div class=\"layout-title\">Billed</div>\
         <div id=\"layout-icon1\" data-testid=\"icon-window\"{}></div>\
         <div id=\"layout-icon2\" data-testid=\"icon-mail\"{}></div>\
         </div>",
        class_for(Route::Bills),
        class_for(Route::NewBill)
    )
}

fn page(active: Route, content: &str) -> String {
    format!(
        "<div class=\"layout\">{}<div class=\"content\">{content}</div></div>",
        vertical_layout(active)
    )
}

/// 読み込み中の画面
pub fn loading_page(active: Route) -> String {
    page(active, "<div id=\"loading\">Loading...</div>")
}

/// エラー画面
///
/// 404は"Erreur 404"、5xxは"Erreur 500"と表示する
pub fn error_page(active: Route, error: &AppError) -> String {
    page(
        active,
        &format!(
            "<div class=\"error-message\" data-testid=\"error-message\">{}</div>",
            escape_html(error.user_message())
        ),
    )
}

fn bill_row(bill: &DisplayBillRecord) -> String {
    let amount = bill
        .bill
        .amount
        .map(|amount| format!("{amount} €"))
        .unwrap_or_default();
    let eye = match &bill.bill.file_url {
        Some(url) => format!(
            "<div class=\"icon-actions\"><div id=\"eye\" data-testid=\"icon-eye\" data-bill-url=\"{}\"></div></div>",
            escape_html(url)
        ),
        None => String::new(),
    };

    format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{eye}</td></tr>",
        escape_html(&bill.bill.expense_type),
        escape_html(&bill.bill.name),
        escape_html(bill.date()),
        escape_html(&amount),
        escape_html(bill.status()),
    )
}

/// ノート一覧画面（日付の新しい順）
pub fn bills_page(bills: &[DisplayBillRecord]) -> String {
    let mut ordered: Vec<&DisplayBillRecord> = bills.iter().collect();
    ordered.sort_by(|a, b| b.sort_key.cmp(&a.sort_key));
    let rows: String = ordered.into_iter().map(bill_row).collect();

    page(
        Route::Bills,
        &format!(
            "<div class=\"content-header\">\
             <div class=\"content-title\">Mes notes de frais</div>\
             <button type=\"button\" data-testid=\"btn-new-bill\" class=\"btn btn-primary\">Nouvelle note de frais</button>\
             </div>\
             <div id=\"data-table\"><table id=\"example\" class=\"table table-striped\">\
             <thead><tr><th>Type</th><th>Nom</th><th>Date</th><th>Montant</th><th>Statut</th><th>Actions</th></tr></thead>\
             <tbody data-testid=\"tbody\">{rows}</tbody>\
             </table></div>"
        ),
    )
}

/// 経費の種類の選択肢
pub const EXPENSE_TYPES: [&str; 7] = [
    "Transports",
    "Restaurants et bars",
    "Hôtel et logement",
    "Services en ligne",
    "IT et électronique",
    "Equipement et matériel",
    "Fournitures de bureau",
];

/// ノート作成画面
pub fn new_bill_page() -> String {
    let options: String = EXPENSE_TYPES
        .iter()
        .map(|t| format!("<option>{}</option>", escape_html(t)))
        .collect();

    page(
        Route::NewBill,
        &format!(
            "<div class=\"content-header\"><div class=\"content-title\">Envoyer une note de frais</div></div>\
             <form data-testid=\"form-new-bill\">\
             <select required data-testid=\"expense-type\">{options}</select>\
             <input type=\"text\" data-testid=\"expense-name\" placeholder=\"Vol Paris Londres\" />\
             <input required type=\"date\" data-testid=\"datepicker\" />\
             <input required type=\"number\" data-testid=\"amount\" placeholder=\"348\" />\
             <input type=\"number\" data-testid=\"vat\" placeholder=\"70\" />\
             <input required type=\"number\" data-testid=\"pct\" placeholder=\"20\" />\
             <textarea data-testid=\"commentary\"></textarea>\
             <input required type=\"file\" data-testid=\"file\" />\
             <button type=\"submit\" id=\"btn-send-bill\">Envoyer</button>\
             </form>"
        ),
    )
}

/// ログイン画面・管理者画面など、このクレートが描画しない画面
pub fn placeholder_page(route: Route) -> String {
    format!(
        "<div data-testid=\"route\" data-route=\"{}\"></div>",
        escape_html(route.path())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::bills::models::BillRecord;

    fn display(date: &str, name: &str) -> DisplayBillRecord {
        let bill: BillRecord = serde_json::from_value(serde_json::json!({
            "name": name,
            "date": format!("formatted-{date}"),
            "status": "En attente",
            "amount": 100,
        }))
        .unwrap();
        DisplayBillRecord {
            bill,
            sort_key: date.to_string(),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>\"Tom & Jerry's\"</b>"),
            "&lt;b&gt;&quot;Tom &amp; Jerry&#39;s&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_active_icon() {
        let layout = vertical_layout(Route::Bills);
        assert!(layout.contains("data-testid=\"icon-window\" class=\"active-icon\""));
        assert!(!layout.contains("data-testid=\"icon-mail\" class=\"active-icon\""));

        let layout = vertical_layout(Route::NewBill);
        assert!(layout.contains("data-testid=\"icon-mail\" class=\"active-icon\""));
    }

    #[test]
    fn test_bills_page_orders_latest_first() {
        let html = bills_page(&[
            display("2001-01-01", "premier"),
            display("2004-04-04", "dernier"),
            display("2002-02-02", "second"),
        ]);

        let latest = html.find("dernier").unwrap();
        let middle = html.find("second").unwrap();
        let oldest = html.find("premier").unwrap();
        assert!(latest < middle && middle < oldest);
        assert!(html.contains("Mes notes de frais"));
        assert!(html.contains("100 €"));
    }

    #[test]
    fn test_error_page_shows_user_message() {
        let html = error_page(Route::Bills, &AppError::from_store_message("Erreur 404"));
        assert!(html.contains(">Erreur 404<"));

        let html = error_page(Route::Bills, &AppError::from_status(503, "indisponible"));
        assert!(html.contains(">Erreur 500<"));
    }

    #[test]
    fn test_new_bill_page_has_form() {
        let html = new_bill_page();
        assert!(html.contains("data-testid=\"form-new-bill\""));
        assert!(html.contains("data-testid=\"file\""));
        assert!(html.contains("Hôtel et logement"));
    }
}
