/// Declares the registry of every source the binary can run.
macro_rules! register_sources {
    ($($id:ident($source:ty) => $initializer:expr),+ $(,)?) => {
        enum FeedSourceRegistry {
            $($id($source),)+
        }

        impl FeedSourceRegistry {
            fn identifier(&self) -> &'static str {
                match self {
                    $(Self::$id(_) => <$source>::IDENTIFIER,)+
                }
            }

            async fn save_run(
                self,
                core: &FeedCore<HttpFetcher>,
                out_dir: &Path,
                rows_limit: Option<usize>,
            ) -> SourceOutcome {
                let identifier = self.identifier();
                let result = match self {
                    $(Self::$id(source) => {
                        crate::save_run(core, out_dir, source, rows_limit).await
                    })+
                };
                (identifier, result)
            }
        }

        /// Identifiers of every registered source, in run order.
        #[cfg(test)]
        const SOURCE_IDENTIFIERS: &[&str] = &[$(<$source>::IDENTIFIER,)+];

        fn construct_tasks<'a>(
            core: &'a FeedCore<HttpFetcher>,
            out_dir: &'a Path,
            selection: &Selection,
            rows_limit: Option<usize>,
        ) -> Vec<impl std::future::Future<Output = SourceOutcome> + 'a> {
            [$(FeedSourceRegistry::$id($initializer),)+]
                .into_iter()
                .filter(|task| selection.contains(task.identifier()))
                .map(|task| task.save_run(core, out_dir, rows_limit))
                .collect()
        }
    };
}

pub(crate) use register_sources;
