//! Reply texts. All of them are sent with HTML parse mode unless noted, so
//! every value that came from a user, the chain or a completion is escaped.

use teloxide::utils::html::escape;

use crate::{
    constants::TOKEN_SYMBOL,
    models::{ContractRecord, GiftRecord, Product, User},
};

pub const SETTINGS: &str = "⚙️ הגדרות - <i>בפיתוח</i>";
pub const FALLBACK: &str = "אשמח לעזור לך! בחר אחת האפשרויות מהתפריט 📱";
pub const BACK_MAIN: &str = "חזרת לתפריט הראשי";
pub const NO_STATS: &str = "לא נמצאו נתונים עבורך במערכת.";

// Plain text, no parse mode.
pub const INVALID_WALLET: &str = "❌ כתובת ארנק לא תקינה.";
pub const WALLET_SAVE_ERROR: &str = "❌ שגיאה בשמירת כתובת הארנק.";
pub const AI_EMPTY_QUESTION: &str = "🤖 נא לכתוב שאלה אחרי הפקודה /ai";
pub const STORE_ERROR: &str = "❌ אירעה שגיאה. נסה שוב מאוחר יותר.";
pub const CONTRACT_USAGE: &str = "📝 שלח /contract ואחריו את נוסח החוזה כדי לשמור אותו.";
pub const CONTRACT_SAVED: &str = "✅ החוזה נשמר.";
pub const HISTORY_EMPTY: &str = "📜 עדיין לא שלחת מתנות.";
pub const PRODUCT_USAGE: &str = "שימוש: /add שם מוצר, מחיר";
pub const STORE_EMPTY: &str = "אין מוצרים בחנות שלך.";

// AI prompts and the contexts that go with them.
pub const AI_CHAT_CONTEXT: &str = "אתה עוזר AI לפלטפורמת מסחר SLH.";
pub const CONTRACT_HELP_PROMPT: &str = "תן טיפים לכתיבת חוזה SLH";
pub const CONTRACT_HELP_CONTEXT: &str = "אתה עוזר בכתיבת חוזים";
pub const INVESTMENT_PROMPT: &str = "תן ייעוץ השקעות כללי למטבע SLH";
pub const INVESTMENT_CONTEXT: &str = "אתה יועץ השקעות";

pub const AI_MENU: &str = r#"<b>🤖 עוזר AI של SLH</b>

אני כאן כדי לעזור לך עם:

<b>📝 עזרה בכתיבת חוזה</b>
- תיאורים מקצועיים
- נוסחים משפטיים

<b>💡 ייעוץ השקעות</b>
- אסטרטגיות מסחר
- ניתוח הזדמנויות

<b>🎯 בחר אפשרות או שלח שאלה:</b>
"/ai [השאלה שלך]""#;

/// Fixed-point rendering with `,` thousands separators, e.g. `1,234.50`.
pub fn format_amount(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let is_zero = formatted.chars().all(|c| c == '0' || c == '.');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };
    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

pub fn welcome(first_name: &str, slh_value_ils: f64, community_url: &str) -> String {
    format!(
        r#"👋 <b>ברוך הבא {first_name}!</b>

<b>SLH Platform</b> - הפלטפורמה למסחר במטבע SLH

💎 <b>מטבע SLH:</b> ערך נוכחי {slh_value_ils} ₪
🤖 <b>עוזר AI:</b> זמין לסיוע
👥 <b>קהילה:</b> מאות סוחרים פעילים

<b>🚀 מה תוכל לעשות:</b>
• 👛 ניהול ארנק SLH
• 🎁 שליחת מתנות בקהילה
• 🤖 סיוע AI מתקדם
• 👥 מסחר בקהילה פעילה

<b>👥 הצטרף לקהילה שלנו:</b>
{community_url}

בחר אחת האפשרויות למטה 👇"#,
        first_name = escape(first_name),
        community_url = escape(community_url),
    )
}

pub fn wallet_overview(
    user: &User,
    address: &str,
    balance: f64,
    slh_value_ils: f64,
    community_url: &str,
) -> String {
    format!(
        r#"<b>👛 הארנק שלך</b>

<b>כתובת ארנק:</b>
<code>{address}</code>

<b>💰 יתרת {symbol}:</b> {balance} {symbol}
<b>💎 שווי נוכחי:</b> {value} ₪

<b>📊 סטטיסטיקות:</b>
🎁 מתנות שנשלחו: {sent} {symbol}
🎁 מתנות שהתקבלו: {received} {symbol}

<b>👥 הצטרף לקהילה:</b>
{community_url}"#,
        address = escape(address),
        symbol = TOKEN_SYMBOL,
        balance = format_amount(balance, 2),
        value = format_amount(balance * slh_value_ils, 0),
        sent = format_amount(user.total_gifts_sent, 0),
        received = format_amount(user.total_gifts_received, 0),
        community_url = escape(community_url),
    )
}

pub fn wallet_missing(community_url: &str) -> String {
    format!(
        r#"<b>👛 הארנק שלך</b>

עדיין לא רשומה כתובת ארנק.

<b>📝 כדי להתחיל:</b>
1. שלח את כתובת ה-BSC שלך (מתחיל ב-0x)
2. הצטרף לקהילה: {community_url}
3. התחל לסחור ולקבל מתנות!

<b>שלח את כתובת הארנק שלך עכשיו...</b>"#,
        community_url = escape(community_url),
    )
}

pub fn wallet_saved(address: &str, balance: f64, community_url: &str) -> String {
    format!(
        r#"<b>✅ כתובת הארנק נשמרה!</b>

<b>כתובת:</b> <code>{address}</code>
<b>💰 יתרה:</b> {balance} {symbol}

<b>🎉 כעת אתה יכול:</b>
• לסחור עם חברי הקהילה
• לשלוח ולקבל מתנות
• להיות חלק מהמהפכה!

<b>👥 הצטרף לקהילה:</b>
{community_url}"#,
        address = escape(address),
        symbol = TOKEN_SYMBOL,
        balance = format_amount(balance, 2),
        community_url = escape(community_url),
    )
}

pub fn ai_answer(answer: &str, community_url: &str) -> String {
    format!(
        r#"<b>🤖 עוזר AI:</b>

{answer}

<b>💡 טיפ:</b> הצטרף לקהילה לדיונים נוספים:
{community_url}"#,
        answer = escape(answer),
        community_url = escape(community_url),
    )
}

pub fn contract_tips(answer: &str) -> String {
    format!("<b>🤖 טיפים לכתיבת חוזה:</b>\n\n{}", escape(answer))
}

pub fn investment_advice(answer: &str) -> String {
    format!("<b>💡 ייעוץ השקעות:</b>\n\n{}", escape(answer))
}

pub fn community(community_url: &str) -> String {
    format!(
        r#"<b>👥 קהילת SLH</b>

<b>🌐 הצטרף עכשיו:</b>
{community_url}

<b>💎 מה מחכה לך:</b>
• מאות סוחרים פעילים
• דיונים על מגמות SLH
• הזדמנויות עסקיות
• תמיכה טכנית

<b>🚀 שלבי ההצטרפות:</b>
1. לחץ על '👥 הצטרף לקהילה'
2. הוסף את עצמך לקבוצה
3. חזור לבוט ולחץ '✅ אישור הצטרפות'"#,
        community_url = escape(community_url),
    )
}

pub fn join_confirmed(community_url: &str) -> String {
    format!(
        "✅ <b>הצטרפות אושרה!</b>\n\nברוך הבא לקהילת SLH!\n\n<b>👥 קבוצה:</b> {}",
        escape(community_url)
    )
}

pub fn stats(user: &User, community_url: &str) -> String {
    let group_status = if user.joined_group {
        "✅ חבר בקהילה"
    } else {
        "❌ טרם הצטרף"
    };
    let footer = if user.joined_group {
        "תודה שהצטרפת!".to_string()
    } else {
        escape(community_url)
    };
    format!(
        r#"<b>📊 הסטטיסטיקה שלך</b>

<b>👤 פרטים:</b>
שם: {name}
משתמש: @{username}

<b>💼 פעילות:</b>
🎁 מתנות שנשלחו: {sent} {symbol}
🎁 מתנות שהתקבלו: {received} {symbol}

<b>👥 סטטוס קהילה:</b> {group_status}

<b>👥 {group_status}</b>
{footer}"#,
        name = escape(&user.display_name()),
        username = escape(user.username.as_deref().unwrap_or("לא רשום")),
        sent = format_amount(user.total_gifts_sent, 0),
        received = format_amount(user.total_gifts_received, 0),
        symbol = TOKEN_SYMBOL,
    )
}

pub fn gift_menu(slh_value_ils: f64, community_url: &str) -> String {
    format!(
        r#"<b>🎁 שליחת מתנות SLH</b>

<b>💎 ערך מטבע:</b> {slh_value_ils} ₪
<b>👥 קהילה:</b> {community_url}

<b>🚀 אפשרויות:</b>
• מתנה מהירה
• מתנה עם הודעה
• מתנה עם תנאים

<i>פיצ'ר בפיתוח - בקרוב!</i>"#,
        community_url = escape(community_url),
    )
}

pub fn contract_current(contract: &ContractRecord) -> String {
    format!(
        "<b>📝 החוזה השמור שלך</b> ({})\n\n{}",
        contract.updated_at.format("%d/%m/%Y %H:%M"),
        escape(&contract.body)
    )
}

pub fn history(gifts: &[GiftRecord]) -> String {
    let mut text = String::from("<b>📜 היסטוריית מתנות</b>\n");
    for gift in gifts {
        text.push_str(&format!(
            "\n🎁 {} {} → <code>{}</code> ({})",
            format_amount(gift.amount, 2),
            TOKEN_SYMBOL,
            escape(&gift.recipient_address),
            gift.created_at.format("%d/%m/%Y")
        ));
    }
    text
}

// Product store and balance replies are plain text.

pub fn product_added(name: &str) -> String {
    format!("המוצר {} נוסף לחנות שלך.", name)
}

pub fn store_listing(products: &[Product]) -> String {
    products
        .iter()
        .map(|p| format!("🛍️ {} - {} {}", p.name, format_amount(p.price_slh, 2), TOKEN_SYMBOL))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn balance(balance: f64) -> String {
    format!("היתרה שלך: {} {}", format_amount(balance, 2), TOKEN_SYMBOL)
}
