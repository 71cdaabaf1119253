use serde::{Deserialize, Serialize};

/// Метаданные пагинации из ответа backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total_items: u64,
    pub total_pages: u32,
    pub current_page: u32,
    pub page_size: u32,
}

impl Pagination {
    /// Следующая страница, пока текущая меньше общего числа страниц.
    pub fn next_page(&self) -> Option<u32> {
        (self.current_page < self.total_pages).then(|| self.current_page + 1)
    }
}

/// Конверт списка: `{ data, pagination? }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

impl<T> Page<T> {
    /// Пустая страница для случаев, когда запрос не нужен (нет адреса и т.п.).
    pub fn empty(page_size: u32) -> Self {
        Page {
            data: Vec::new(),
            pagination: Some(Pagination { total_items: 0, total_pages: 0, current_page: 1, page_size }),
        }
    }

    pub fn next_page(&self) -> Option<u32> {
        self.pagination.as_ref().and_then(Pagination::next_page)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Конверт одиночного объекта: `{ data }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_page_stops_at_last_page() {
        let mut p = Pagination { total_items: 25, total_pages: 3, current_page: 2, page_size: 10 };
        assert_eq!(p.next_page(), Some(3));
        p.current_page = 3;
        assert_eq!(p.next_page(), None);
    }

    #[test]
    fn pagination_is_optional_in_envelope() {
        let page: Page<u32> = serde_json::from_str(r#"{"data":[1,2]}"#).unwrap();
        assert_eq!(page.data, vec![1, 2]);
        assert!(page.pagination.is_none());
        assert_eq!(page.next_page(), None);
    }

    #[test]
    fn reads_camel_case_pagination() {
        let page: Page<u32> = serde_json::from_str(
            r#"{"data":[],"pagination":{"totalItems":3,"totalPages":1,"currentPage":1,"pageSize":12}}"#,
        )
        .unwrap();
        assert_eq!(page.pagination.unwrap().page_size, 12);
    }
}
