use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use ts_rs::TS;

// 课程模块：有序的内容条目列表
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "content.ts")]
pub struct ContentModule {
    pub id: i64,
    pub class_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub items: Vec<i64>,
    pub position: i32,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl ContentModule {
    /// 插入条目；position 缺省或越界时追加到末尾
    pub fn insert_item(&mut self, item_id: i64, position: Option<usize>) -> Result<(), String> {
        if self.items.contains(&item_id) {
            return Err(format!("Content item {item_id} is already in this module"));
        }
        let index = position
            .filter(|p| *p <= self.items.len())
            .unwrap_or(self.items.len());
        self.items.insert(index, item_id);
        Ok(())
    }

    /// 移除条目，返回是否存在
    pub fn remove_item(&mut self, item_id: i64) -> bool {
        let before = self.items.len();
        self.items.retain(|id| *id != item_id);
        before != self.items.len()
    }

    /// 重新排序：新列表必须是现有条目的一个排列
    pub fn reorder(&mut self, items: Vec<i64>) -> Result<(), String> {
        validate_item_list(&items)?;
        let current: HashSet<i64> = self.items.iter().copied().collect();
        let proposed: HashSet<i64> = items.iter().copied().collect();
        if current != proposed {
            return Err("Reordered items must contain exactly the module's current items".into());
        }
        self.items = items;
        Ok(())
    }
}

/// 条目列表不允许重复
pub fn validate_item_list(items: &[i64]) -> Result<(), String> {
    let mut seen = HashSet::with_capacity(items.len());
    for id in items {
        if !seen.insert(*id) {
            return Err(format!("Duplicate content item {id} in module"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(items: Vec<i64>) -> ContentModule {
        let now = chrono::Utc::now();
        ContentModule {
            id: 1,
            class_id: 1,
            title: "Week 1".to_string(),
            description: None,
            items,
            position: 0,
            created_by: 2,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_insert_respects_position_and_rejects_duplicates() {
        let mut m = module(vec![10, 20]);
        m.insert_item(15, Some(1)).expect("insert in middle");
        m.insert_item(30, Some(99)).expect("out of range appends");
        assert_eq!(m.items, vec![10, 15, 20, 30]);
        assert!(m.insert_item(20, None).is_err());
    }

    #[test]
    fn test_remove_item() {
        let mut m = module(vec![1, 2, 3]);
        assert!(m.remove_item(2));
        assert!(!m.remove_item(2));
        assert_eq!(m.items, vec![1, 3]);
    }

    #[test]
    fn test_reorder_requires_permutation() {
        let mut m = module(vec![1, 2, 3]);
        m.reorder(vec![3, 1, 2]).expect("valid permutation");
        assert_eq!(m.items, vec![3, 1, 2]);
        assert!(m.reorder(vec![3, 1]).is_err());
        assert!(m.reorder(vec![3, 3, 1, 2]).is_err());
        assert!(m.reorder(vec![3, 1, 4]).is_err());
    }
}
