use crate::api::{Page, Paged, Result, FIRST_PAGE_NUMBER};
use crate::fetcher::RetryingFetcher;
use log::Level;
use std::future::Future;

pub const MEMBERS_PAGE_SIZE: u32 = 100;
pub const REPOS_PAGE_SIZE: u32 = 10;
pub const SEARCH_PAGE_SIZE: u32 = 1;

/// Walks page cursors handed back by the upstream.
#[derive(Debug)]
struct Paginator {
    page_no: Option<u32>,
    page_size: u32,
}

impl Paginator {
    fn new(page_size: u32) -> Self {
        Paginator {
            page_no: Some(FIRST_PAGE_NUMBER),
            page_size,
        }
    }

    fn next_page(&mut self) -> Option<Page> {
        self.page_no.take().map(|page_no| Page::new(page_no, self.page_size))
    }

    /// A zero, missing or non-advancing cursor ends the walk, so no page is fetched twice.
    fn advance(&mut self, current: Page, next: Option<u32>) {
        self.page_no = next.filter(|next| *next > current.number);
    }
}

/// Fetches every page through `fetcher` and concatenates the items in page order.
pub async fn fetch_all<T, F, Fut>(
    fetcher: &RetryingFetcher<'_>,
    operation: &str,
    page_size: u32,
    mut fetch_page: F,
) -> Result<Vec<T>>
where
    F: FnMut(Page) -> Fut,
    Fut: Future<Output = Result<Paged<T>>>,
{
    let mut paginator = Paginator::new(page_size);
    let mut items = Vec::new();
    while let Some(page) = paginator.next_page() {
        let page_operation = format!("{} (page {})", operation, page.number);
        let paged = fetcher.fetch(&page_operation, || fetch_page(page)).await?;
        fetcher.diagnostics().emit(
            Level::Debug,
            &format!("{}: got {} items", page_operation, paged.items.len()),
        );
        items.extend(paged.items);
        paginator.advance(page, paged.next);
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Error;
    use crate::diagnostics::RecordingDiagnostics;
    use std::cell::RefCell;

    #[test]
    fn paginator_stops_on_missing_or_zero_cursor() {
        let mut paginator = Paginator::new(10);
        let first = paginator.next_page().unwrap();
        assert_eq!(first, Page::new(1, 10));
        assert_eq!(paginator.next_page(), None);

        paginator.advance(first, Some(2));
        let second = paginator.next_page().unwrap();
        assert_eq!(second, Page::new(2, 10));

        paginator.advance(second, Some(0));
        assert_eq!(paginator.next_page(), None);
    }

    #[test]
    fn paginator_never_goes_back() {
        let mut paginator = Paginator::new(100);
        let first = paginator.next_page().unwrap();
        paginator.advance(first, Some(1));
        assert_eq!(paginator.next_page(), None);
    }

    #[tokio::test]
    async fn fetch_all_concatenates_pages_in_order() {
        const PAGES: u32 = 4;
        const PER_PAGE: u32 = 3;
        let diagnostics = RecordingDiagnostics::default();
        let fetcher = RetryingFetcher::new(&diagnostics);
        let requested = RefCell::new(Vec::new());

        let items = fetch_all(&fetcher, "list things", PER_PAGE, |page| {
            requested.borrow_mut().push(page);
            async move {
                let items = (0..page.per_page)
                    .map(|i| (page.number - 1) * page.per_page + i)
                    .collect();
                let next = if page.number < PAGES { Some(page.number + 1) } else { None };
                Ok(Paged::new(items, next))
            }
        })
        .await
        .unwrap();

        assert_eq!(items, (0..PAGES * PER_PAGE).collect::<Vec<_>>());
        let numbers: Vec<u32> = requested.borrow().iter().map(|page| page.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert!(requested.borrow().iter().all(|page| page.per_page == PER_PAGE));
    }

    #[tokio::test]
    async fn fetch_all_retries_a_page_without_duplicating_it() {
        let diagnostics = RecordingDiagnostics::default();
        let fetcher = RetryingFetcher::new(&diagnostics);
        let calls = RefCell::new(0);

        let items = fetch_all(&fetcher, "list members of acme", MEMBERS_PAGE_SIZE, |page| {
            *calls.borrow_mut() += 1;
            let call = *calls.borrow();
            async move {
                match (page.number, call) {
                    (1, _) => Ok(Paged::new(vec!["a", "b"], Some(2))),
                    (2, 2) => Err(Error::NotReady),
                    (2, _) => Ok(Paged::last(vec!["c"])),
                    _ => unreachable!(),
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(items, vec!["a", "b", "c"]);
        assert_eq!(*calls.borrow(), 3);
    }

    #[tokio::test]
    async fn fetch_all_propagates_terminal_error_with_page() {
        let diagnostics = RecordingDiagnostics::default();
        let fetcher = RetryingFetcher::new(&diagnostics);

        let result: Result<Vec<u32>> = fetch_all(&fetcher, "list repositories of acme", REPOS_PAGE_SIZE, |page| async move {
            if page.number == 1 {
                Ok(Paged::new(vec![1], Some(2)))
            } else {
                Err(Error::Status {
                    status: 500,
                    message: "Server Error".to_string(),
                })
            }
        })
        .await;

        let err = result.unwrap_err();
        assert!(err
            .to_string()
            .starts_with("list repositories of acme (page 2): Unexpected response status 500"));
    }
}
