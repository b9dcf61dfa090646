//! Reconciliation of repository change lists into cache snapshots.

use std::collections::BTreeSet;
use std::sync::Arc;

use quire_repo::{paths, RepositoryHandle};
use quire_types::{CacheSnapshot, ConfigurationList, ContentLayout, PostCache, PostKey};
use tracing::{debug, info};

use crate::compiler::SourceCompiler;
use crate::configuration::TomlConfigurations;
use crate::error::UpdateResult;
use crate::names::PathNames;
use crate::traits::{ConfigurationSource, NameDeriver, PostCompiler};

/// Result of one [`Updater::check_updates`] call.
#[derive(Clone, Debug, PartialEq)]
pub enum UpdateOutcome {
    /// The repository had no pending changes. Nothing was computed.
    NoUpdates,
    /// A complete replacement for the caller's snapshot.
    Updates {
        posts: PostCache,
        configurations: ConfigurationList,
    },
}

impl UpdateOutcome {
    pub fn has_updates(&self) -> bool {
        matches!(self, Self::Updates { .. })
    }

    /// The new snapshot, or `None` for [`UpdateOutcome::NoUpdates`].
    pub fn into_snapshot(self) -> Option<CacheSnapshot> {
        match self {
            Self::NoUpdates => None,
            Self::Updates {
                posts,
                configurations,
            } => Some(CacheSnapshot::new(posts, configurations)),
        }
    }
}

/// Turns a provider's pending changes into a new cache snapshot.
///
/// The updater holds no cache state of its own and never modifies the
/// snapshot it is given. It performs no retries: any provider or
/// collaborator error is returned as-is and no partial result escapes.
///
/// Calls for the same repository must be serialized by the owner, since the
/// provider's `fetch` hands each batch of changes to one caller only.
pub struct Updater {
    repo: RepositoryHandle,
    layout: ContentLayout,
    compiler: Arc<dyn PostCompiler>,
    custom_compiler: bool,
    names: Arc<dyn NameDeriver>,
    configurations: Arc<dyn ConfigurationSource>,
}

impl Updater {
    /// Updater using the reference collaborators for `layout`.
    pub fn new(repo: RepositoryHandle, layout: ContentLayout) -> Self {
        let names: Arc<dyn NameDeriver> = Arc::new(PathNames::new(&layout));
        Self {
            compiler: Arc::new(SourceCompiler::with_names(&layout, names.clone())),
            custom_compiler: false,
            names,
            configurations: Arc::new(TomlConfigurations::new(&layout)),
            repo,
            layout,
        }
    }

    /// Replace the post compiler. It must derive the same keys as the
    /// configured [`NameDeriver`], or deletions will miss compiled posts.
    pub fn with_compiler(mut self, compiler: Arc<dyn PostCompiler>) -> Self {
        self.compiler = compiler;
        self.custom_compiler = true;
        self
    }

    /// Replace the name deriver. The reference compiler, if still in use,
    /// switches to the same deriver.
    pub fn with_names(mut self, names: Arc<dyn NameDeriver>) -> Self {
        if !self.custom_compiler {
            self.compiler = Arc::new(SourceCompiler::with_names(&self.layout, names.clone()));
        }
        self.names = names;
        self
    }

    pub fn with_configuration_source(mut self, source: Arc<dyn ConfigurationSource>) -> Self {
        self.configurations = source;
        self
    }

    pub fn repository(&self) -> &RepositoryHandle {
        &self.repo
    }

    pub fn layout(&self) -> &ContentLayout {
        &self.layout
    }

    /// Fetch pending changes and reconcile them against `state`.
    ///
    /// Changed paths the provider still has are compiled and merged over the
    /// existing posts; posts-folder paths it no longer has are removed.
    /// Configuration is reloaded wholesale when any configuration file
    /// changed, and carried over otherwise.
    pub fn check_updates(&self, state: &CacheSnapshot) -> UpdateResult<UpdateOutcome> {
        let Some(changed) = self.repo.fetch()?.into_paths() else {
            debug!(repo = %self.repo.reference(), "no pending changes");
            return Ok(UpdateOutcome::NoUpdates);
        };

        let folder = &self.layout.posts_folder;
        let partition = paths::partition(&changed, |path| self.repo.file_in(path))?;
        let upserted = partition.present_posts(folder);
        let removed = self.names.names_from_paths(&partition.absent_posts(folder));
        debug!(
            changed = changed.len(),
            upserted = upserted.len(),
            removed = removed.len(),
            "classified changes"
        );

        let fresh = self.compiler.compile_posts(&upserted, &self.repo)?;
        let posts = merge_and_remove(&state.posts, fresh, &removed);
        let configurations = self.reconcile_configurations(&changed, &state.configurations)?;

        info!(
            repo = %self.repo.reference(),
            changed = changed.len(),
            posts = posts.len(),
            configurations = configurations.len(),
            "reconciled updates"
        );
        Ok(UpdateOutcome::Updates {
            posts,
            configurations,
        })
    }

    fn reconcile_configurations(
        &self,
        changed: &BTreeSet<String>,
        current: &ConfigurationList,
    ) -> UpdateResult<ConfigurationList> {
        if self.configurations.configuration_changed(changed) {
            debug!("configuration changed, reloading");
            self.configurations.load_configuration(&self.repo)
        } else {
            Ok(current.clone())
        }
    }
}

/// Merge `fresh` over `current`, then drop `removed` keys.
///
/// A key that was just compiled is never dropped, even if a removed path
/// maps to the same key.
fn merge_and_remove(current: &PostCache, fresh: PostCache, removed: &[PostKey]) -> PostCache {
    let compiled: BTreeSet<PostKey> = fresh.iter().map(|p| p.key.clone()).collect();
    let mut posts = current.merged(fresh);
    for key in removed.iter().filter(|k| !compiled.contains(*k)) {
        posts.remove(key);
    }
    posts
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use chrono::{DateTime, Utc};
    use quire_repo::{MemoryProvider, RepoError, RepositoryRef};
    use quire_types::{Configuration, Post, RawPost};

    use super::*;
    use crate::error::UpdateError;

    fn post(language: &str, name: &str, title: &str) -> Post {
        Post {
            key: PostKey::new(language, name),
            title: title.into(),
            author: "x".into(),
            body: String::new(),
            source_path: format!("{name}.md"),
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    fn setup() -> (Arc<MemoryProvider>, Updater) {
        let provider = Arc::new(MemoryProvider::new());
        let handle = RepositoryHandle::new(provider.clone(), RepositoryRef::new("memory:test"));
        (provider, Updater::new(handle, ContentLayout::default()))
    }

    fn apply(updater: &Updater, state: &CacheSnapshot) -> CacheSnapshot {
        updater
            .check_updates(state)
            .unwrap()
            .into_snapshot()
            .expect("expected updates")
    }

    /// Compiler returning a fixed cache and recording the paths it was given.
    struct FixedCompiler {
        output: PostCache,
        seen: Mutex<Vec<String>>,
    }

    impl PostCompiler for FixedCompiler {
        fn compile_posts(&self, paths: &[String], _repo: &RepositoryHandle) -> UpdateResult<PostCache> {
            self.seen.lock().unwrap().extend_from_slice(paths);
            Ok(self.output.clone())
        }
    }

    struct FailingCompiler;

    impl PostCompiler for FailingCompiler {
        fn compile_posts(&self, paths: &[String], _repo: &RepositoryHandle) -> UpdateResult<PostCache> {
            Err(UpdateError::Compile {
                path: paths.first().cloned().unwrap_or_default(),
                reason: "broken front matter".into(),
            })
        }
    }

    /// Configuration source that always reports a change and counts loads.
    struct CountingConfigurations {
        loads: AtomicUsize,
    }

    impl ConfigurationSource for CountingConfigurations {
        fn configuration_changed(&self, _changed: &BTreeSet<String>) -> bool {
            true
        }

        fn load_configuration(&self, _repo: &RepositoryHandle) -> UpdateResult<ConfigurationList> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(vec![Configuration::new("fresh.toml", toml::Table::new())].into())
        }
    }

    // -----------------------------------------------------------------------
    // No pending changes
    // -----------------------------------------------------------------------

    #[test]
    fn no_changes_returns_no_updates() {
        let (_provider, updater) = setup();
        let state = CacheSnapshot::new([post("en", "a", "A")].into_iter().collect(), Default::default());
        let outcome = updater.check_updates(&state).unwrap();
        assert_eq!(outcome, UpdateOutcome::NoUpdates);
        assert!(!outcome.has_updates());
        assert_eq!(state.posts.len(), 1);
    }

    #[test]
    fn no_changes_does_not_touch_collaborators() {
        let (_provider, updater) = setup();
        let configs = Arc::new(CountingConfigurations {
            loads: AtomicUsize::new(0),
        });
        let updater = updater
            .with_compiler(Arc::new(FailingCompiler))
            .with_configuration_source(configs.clone());

        assert_eq!(
            updater.check_updates(&CacheSnapshot::default()).unwrap(),
            UpdateOutcome::NoUpdates
        );
        assert_eq!(configs.loads.load(Ordering::SeqCst), 0);
    }

    // -----------------------------------------------------------------------
    // End-to-end with the memory provider
    // -----------------------------------------------------------------------

    #[test]
    fn added_post_is_materialized_then_drained() {
        let (provider, updater) = setup();
        provider.add_post(RawPost::new("x", "p1.md", "# T")).unwrap();

        let snapshot = apply(&updater, &CacheSnapshot::default());
        let p1 = snapshot.posts.get("en", "p1").expect("p1 compiled");
        assert_eq!(p1.title, "T");
        assert_eq!(p1.author, "x");

        assert_eq!(updater.check_updates(&snapshot).unwrap(), UpdateOutcome::NoUpdates);
    }

    #[test]
    fn add_then_delete_in_one_batch_leaves_no_entry() {
        let (provider, updater) = setup();
        provider.add_post(RawPost::new("x", "p1.md", "# T")).unwrap();
        provider.delete_post("p1.md").unwrap();
        assert_eq!(provider.state().unwrap().pending_changes.len(), 2);

        let snapshot = apply(&updater, &CacheSnapshot::default());
        assert!(snapshot.posts.get("en", "p1").is_none());
    }

    #[test]
    fn deleted_post_is_removed_from_cache() {
        let (provider, updater) = setup();
        provider.add_post(RawPost::new("x", "p1.md", "# One")).unwrap();
        provider.add_post(RawPost::new("x", "p2.md", "# Two")).unwrap();
        let snapshot = apply(&updater, &CacheSnapshot::default());
        assert_eq!(snapshot.posts.len(), 2);

        provider.delete_post("p1.md").unwrap();
        let snapshot = apply(&updater, &snapshot);
        assert!(snapshot.posts.get("en", "p1").is_none());
        assert_eq!(snapshot.posts.get("en", "p2").unwrap().title, "Two");
    }

    #[test]
    fn replaced_post_is_recompiled() {
        let (provider, updater) = setup();
        provider.add_post(RawPost::new("x", "p1.md", "# Old")).unwrap();
        let snapshot = apply(&updater, &CacheSnapshot::default());

        provider.replace_post(RawPost::new("y", "p1.md", "# New")).unwrap();
        let snapshot = apply(&updater, &snapshot);
        let p1 = snapshot.posts.get("en", "p1").unwrap();
        assert_eq!(p1.title, "New");
        assert_eq!(p1.author, "y");
        assert_eq!(snapshot.posts.len(), 1);
    }

    #[test]
    fn deleting_absent_post_leaves_cache_unchanged() {
        let (provider, updater) = setup();
        let state = CacheSnapshot::new([post("en", "a", "A")].into_iter().collect(), Default::default());
        provider.delete_post("never-existed.md").unwrap();

        let snapshot = apply(&updater, &state);
        assert_eq!(snapshot, state);
    }

    #[test]
    fn non_post_files_outside_posts_folder_are_ignored() {
        let (provider, updater) = setup();
        let state = CacheSnapshot::new([post("en", "a", "A")].into_iter().collect(), Default::default());
        provider.add_file("assets/logo.svg", "<svg/>").unwrap();

        let snapshot = apply(&updater, &state);
        assert_eq!(snapshot.posts, state.posts);
    }

    #[test]
    fn post_under_folder_named_like_posts_folder() {
        let (provider, updater) = setup();
        provider.add_post(RawPost::new("x", "posts/hello.md", "# Hi")).unwrap();

        let snapshot = apply(&updater, &CacheSnapshot::default());
        assert_eq!(snapshot.posts.get("posts", "hello").unwrap().title, "Hi");

        provider.replace_post(RawPost::new("x", "posts/hello.md", "# Hi again")).unwrap();
        let snapshot = apply(&updater, &snapshot);
        assert_eq!(snapshot.posts.get("posts", "hello").unwrap().title, "Hi again");
    }

    #[test]
    fn custom_deriver_keys_compile_and_delete_alike() {
        struct Archived;

        impl NameDeriver for Archived {
            fn names_from_paths(&self, paths: &[String]) -> Vec<PostKey> {
                paths.iter().map(|p| PostKey::new("archive", p.trim_end_matches(".md"))).collect()
            }
        }

        let (provider, updater) = setup();
        let updater = updater.with_names(Arc::new(Archived));
        provider.add_post(RawPost::new("x", "p1.md", "# One")).unwrap();

        let snapshot = apply(&updater, &CacheSnapshot::default());
        assert_eq!(snapshot.posts.get("archive", "p1").unwrap().title, "One");

        provider.delete_post("p1.md").unwrap();
        let snapshot = apply(&updater, &snapshot);
        assert!(snapshot.posts.is_empty());
    }

    #[test]
    fn languages_from_directories() {
        let (provider, updater) = setup();
        provider.add_post(RawPost::new("x", "fr/bonjour.md", "# Bonjour")).unwrap();
        provider.add_post(RawPost::new("x", "hello.md", "# Hello")).unwrap();

        let snapshot = apply(&updater, &CacheSnapshot::default());
        assert_eq!(snapshot.posts.languages().collect::<Vec<_>>(), vec!["en", "fr"]);
        assert_eq!(snapshot.posts.get("fr", "bonjour").unwrap().title, "Bonjour");
    }

    #[test]
    fn configuration_reloads_on_config_change() {
        let (provider, updater) = setup();
        provider.add_file("config.toml", "title = \"Blog\"").unwrap();

        let snapshot = apply(&updater, &CacheSnapshot::default());
        assert_eq!(
            snapshot.configurations.get("title").and_then(|v| v.as_str()),
            Some("Blog")
        );

        provider.add_post(RawPost::new("x", "p1.md", "# T")).unwrap();
        let next = apply(&updater, &snapshot);
        assert_eq!(next.configurations, snapshot.configurations);
    }

    // -----------------------------------------------------------------------
    // Merge semantics
    // -----------------------------------------------------------------------

    #[test]
    fn merge_keeps_existing_names() {
        let (provider, updater) = setup();
        let compiler = Arc::new(FixedCompiler {
            output: [post("en", "b", "B")].into_iter().collect(),
            seen: Mutex::new(Vec::new()),
        });
        let updater = updater.with_compiler(compiler.clone());
        provider.add_post(RawPost::new("x", "b.md", "# B")).unwrap();

        let state = CacheSnapshot::new([post("en", "a", "A")].into_iter().collect(), Default::default());
        let snapshot = apply(&updater, &state);
        assert_eq!(snapshot.posts.len(), 2);
        assert_eq!(snapshot.posts.get("en", "a").unwrap().title, "A");
        assert_eq!(snapshot.posts.get("en", "b").unwrap().title, "B");
        // The compiler sees paths relative to the posts folder.
        assert_eq!(*compiler.seen.lock().unwrap(), vec!["b.md".to_string()]);
    }

    #[test]
    fn merge_overwrites_same_name() {
        let (provider, updater) = setup();
        let updater = updater.with_compiler(Arc::new(FixedCompiler {
            output: [post("en", "a", "A2")].into_iter().collect(),
            seen: Mutex::new(Vec::new()),
        }));
        provider.add_post(RawPost::new("x", "a.md", "# A2")).unwrap();

        let state = CacheSnapshot::new([post("en", "a", "A")].into_iter().collect(), Default::default());
        let snapshot = apply(&updater, &state);
        assert_eq!(snapshot.posts.len(), 1);
        assert_eq!(snapshot.posts.get("en", "a").unwrap().title, "A2");
    }

    #[test]
    fn freshly_compiled_key_survives_colliding_deletion() {
        let (provider, updater) = setup();
        // "A.md" is deleted and "a.md" exists; both slug to ("en", "a").
        provider.add_post(RawPost::new("x", "a.md", "# Lower")).unwrap();
        provider.delete_post("A.md").unwrap();

        let snapshot = apply(&updater, &CacheSnapshot::default());
        assert_eq!(snapshot.posts.get("en", "a").unwrap().title, "Lower");
    }

    #[test]
    fn merge_and_remove_helper() {
        let current: PostCache = [post("en", "a", "A"), post("en", "b", "B")].into_iter().collect();
        let fresh: PostCache = [post("en", "c", "C")].into_iter().collect();
        let removed = vec![PostKey::new("en", "b"), PostKey::new("en", "zzz")];

        let posts = merge_and_remove(&current, fresh, &removed);
        let names: Vec<&str> = posts.iter().map(Post::name).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert_eq!(current.len(), 2);
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    #[test]
    fn configuration_reload_is_all_or_nothing() {
        let (provider, updater) = setup();
        let configs = Arc::new(CountingConfigurations {
            loads: AtomicUsize::new(0),
        });
        let updater = updater.with_configuration_source(configs.clone());
        provider.add_file("config.toml", "a = 1").unwrap();

        let state = CacheSnapshot::new(
            PostCache::new(),
            vec![
                Configuration::new("old1.toml", toml::Table::new()),
                Configuration::new("old2.toml", toml::Table::new()),
            ]
            .into(),
        );
        let snapshot = apply(&updater, &state);
        let sources: Vec<&str> = snapshot.configurations.iter().map(|c| c.source.as_str()).collect();
        assert_eq!(sources, vec!["fresh.toml"]);
        assert_eq!(configs.loads.load(Ordering::SeqCst), 1);
    }

    // -----------------------------------------------------------------------
    // Failure propagation
    // -----------------------------------------------------------------------

    #[test]
    fn compiler_error_propagates() {
        let (provider, updater) = setup();
        let updater = updater.with_compiler(Arc::new(FailingCompiler));
        provider.add_post(RawPost::new("x", "p1.md", "# T")).unwrap();

        let err = updater.check_updates(&CacheSnapshot::default()).unwrap_err();
        assert!(matches!(err, UpdateError::Compile { ref path, .. } if path == "p1.md"));
    }

    #[test]
    fn configuration_error_propagates() {
        let (provider, updater) = setup();
        provider.add_file("config.toml", "not = [valid").unwrap();
        let err = updater.check_updates(&CacheSnapshot::default()).unwrap_err();
        assert!(matches!(err, UpdateError::Configuration { .. }));
    }

    #[test]
    fn provider_error_propagates() {
        struct Offline;

        impl quire_repo::RepositoryProvider for Offline {
            fn fetch(&self, _repo: &RepositoryRef) -> quire_repo::RepoResult<quire_repo::FetchResult> {
                Err(RepoError::Backend("remote unreachable".into()))
            }
            fn file_in(&self, _path: &str) -> quire_repo::RepoResult<bool> {
                Ok(false)
            }
            fn list_files(&self, _subpath: &str) -> quire_repo::RepoResult<Vec<String>> {
                Ok(Vec::new())
            }
            fn read_file(&self, _path: &str, _folder: &str) -> quire_repo::RepoResult<Option<String>> {
                Ok(None)
            }
            fn file_info(
                &self,
                _repo: &RepositoryRef,
                _path: &str,
            ) -> quire_repo::RepoResult<quire_types::FileInfo> {
                Ok(quire_types::FileInfo::placeholder())
            }
            fn local_path(&self) -> std::path::PathBuf {
                std::path::PathBuf::from("offline://")
            }
        }

        let handle = RepositoryHandle::new(Arc::new(Offline), RepositoryRef::new("remote"));
        let updater = Updater::new(handle, ContentLayout::default());
        let err = updater.check_updates(&CacheSnapshot::default()).unwrap_err();
        assert!(matches!(err, UpdateError::Repo(RepoError::Backend(_))));
    }
}
