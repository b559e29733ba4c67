//! Demo data for a freshly created contact book.

use contactbook_types::{ContactDraft, ContactMethodType, MethodDraft};
use rusqlite::Connection;
use tracing::info;

use crate::queries::{contacts, methods};
use crate::Result;

/// Insert the demo contacts if the store is empty.
///
/// Returns the number of contacts inserted (0 when data already exists).
pub fn seed_if_empty(conn: &Connection, now: u64) -> Result<usize> {
    if contacts::count(conn)? > 0 {
        info!("Contact store already populated, skipping demo data");
        return Ok(0);
    }

    let demo = demo_contacts();
    let tx = conn.unchecked_transaction()?;
    for draft in &demo {
        let id = contacts::insert(&tx, draft, now)?;
        for method in &draft.methods {
            methods::insert(&tx, id, method, now)?;
        }
    }
    tx.commit()?;

    info!("Inserted {} demo contacts", demo.len());
    Ok(demo.len())
}

fn method(kind: ContactMethodType, label: &str, value: &str, is_primary: bool) -> MethodDraft {
    MethodDraft {
        kind,
        label: Some(label.to_string()),
        value: value.to_string(),
        is_primary,
    }
}

/// The demo contacts.
pub fn demo_contacts() -> Vec<ContactDraft> {
    use ContactMethodType::*;

    vec![
        ContactDraft {
            name: "张三".to_string(),
            company: Some("ABC科技有限公司".to_string()),
            position: Some("软件工程师".to_string()),
            notes: Some("负责后端开发，熟悉.NET和Python".to_string()),
            is_favorite: true,
            photo_path: None,
            methods: vec![
                method(Phone, "工作手机", "13800138000", true),
                method(Email, "工作邮箱", "zhangsan@abc-tech.com", true),
                method(WeChat, "微信", "zhangsan_dev", false),
            ],
        },
        ContactDraft {
            name: "李四".to_string(),
            company: Some("XYZ网络公司".to_string()),
            position: Some("产品经理".to_string()),
            notes: Some("擅长用户体验设计和产品规划".to_string()),
            is_favorite: false,
            photo_path: None,
            methods: vec![
                method(Phone, "个人手机", "13900139000", true),
                method(Email, "个人邮箱", "lisi@example.com", true),
                method(QQ, "QQ", "123456789", false),
                method(Address, "公司地址", "上海市浦东新区世纪大道100号", false),
            ],
        },
        ContactDraft {
            name: "王五".to_string(),
            company: Some("DEF咨询公司".to_string()),
            position: Some("项目经理".to_string()),
            notes: Some("10年项目管理经验，PMP认证".to_string()),
            is_favorite: true,
            photo_path: None,
            methods: vec![
                method(Telephone, "办公电话", "010-12345678", true),
                method(Phone, "手机", "13700137000", true),
                method(Email, "邮箱", "wangwu@def-consulting.com", true),
                method(Address, "办公地址", "北京市朝阳区建国路88号SOHO现代城", false),
                method(WeChat, "微信", "wangwu_pm", false),
            ],
        },
    ]
}
