//! Review host: owns the game, the move cursor and the active review.
//!
//! All fetches are awaited in place. A later fetch overwrites whatever an
//! earlier one set, so repeated pushes only cost extra requests.

use goban::{pretty_coords, BoardSize, Intersection, MoveTree, NodeId, StoneColor};
use review::{
    annotate, rank_reviews, reconcile, Annotation, DisplayEntry, ReconciledReview,
    Review, ReviewType,
};
use review_client::{GameRecord, PushEvent, ReviewRequest, ReviewService};
use tracing::{debug, info, warn};

pub struct ReviewController<S: ReviewService> {
    service: S,
    game_id: u64,
    engine: String,
    game: Option<GameRecord>,
    tree: MoveTree,
    cursor: NodeId,
    /// Review summaries, best first.
    reviews: Vec<Review>,
    selected: Option<String>,
    active: Option<ReconciledReview>,
    loading: bool,
    reviewing: bool,
    update_count: u64,
    pub status_message: Option<String>,
}

impl<S: ReviewService> ReviewController<S> {
    pub fn new(service: S, game_id: u64, engine: impl Into<String>) -> Self {
        let tree = MoveTree::new(BoardSize::NINETEEN, StoneColor::Black);
        let cursor = tree.root();
        Self {
            service,
            game_id,
            engine: engine.into(),
            game: None,
            tree,
            cursor,
            reviews: Vec::new(),
            selected: None,
            active: None,
            loading: true,
            reviewing: false,
            update_count: 0,
            status_message: None,
        }
    }

    pub fn game_id(&self) -> u64 {
        self.game_id
    }

    pub fn game(&self) -> Option<&GameRecord> {
        self.game.as_ref()
    }

    pub fn tree(&self) -> &MoveTree {
        &self.tree
    }

    pub fn cursor(&self) -> NodeId {
        self.cursor
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn active(&self) -> Option<&ReconciledReview> {
        self.active.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// A review was queued and has not shown up in the list yet.
    pub fn is_reviewing(&self) -> bool {
        self.reviewing
    }

    /// Bumped whenever the displayed review data changes.
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Fetch the game record, then the reviews for it.
    pub async fn load(&mut self) {
        self.load_game().await;
        self.load_reviews().await;
    }

    pub async fn load_game(&mut self) {
        match self.service.get_game(self.game_id).await {
            Ok(game) => {
                info!(
                    game_id = self.game_id,
                    moves = game.gamedata.moves.len(),
                    "Game loaded"
                );
                self.tree = game.move_tree();
                self.cursor = self.tree.trunk_end();
                self.game = Some(game);
            }
            Err(e) => {
                warn!(game_id = self.game_id, "Failed to load game: {}", e);
                self.status_message = Some(format!("Failed to load game: {}", e));
            }
        }
    }

    /// Fetch the review list and open the best review. An empty list queues
    /// an automatic review instead.
    pub async fn load_reviews(&mut self) {
        let mut reviews = match self.service.list_reviews(self.game_id).await {
            Ok(reviews) => reviews,
            Err(e) => {
                warn!(game_id = self.game_id, "Failed to list reviews: {}", e);
                return;
            }
        };
        self.loading = false;
        rank_reviews(&mut reviews);
        let best = reviews.first().map(|r| r.id.clone());
        self.reviews = reviews;

        match best {
            Some(id) => {
                self.reviewing = false;
                self.select_review(&id).await;
            }
            None => self.queue_review(ReviewType::Auto).await,
        }
    }

    /// Make `review_id` the selected review and fetch it.
    pub async fn select_review(&mut self, review_id: &str) {
        self.selected = Some(review_id.to_string());
        self.load_review(review_id).await;
    }

    /// Select the review after (or before) the current one in the list.
    pub async fn cycle_review(&mut self, forward: bool) {
        if self.reviews.is_empty() {
            return;
        }
        let len = self.reviews.len();
        let current = self
            .selected
            .as_deref()
            .and_then(|id| self.reviews.iter().position(|r| r.id == id));
        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, _) => 0,
        };
        let id = self.reviews[next].id.clone();
        self.select_review(&id).await;
    }

    /// Fetch the full review. The previous review is dropped before the
    /// request so a failed fetch leaves no stale overlay behind.
    pub async fn load_review(&mut self, review_id: &str) {
        self.active = None;
        self.update_count += 1;

        match self.service.get_review(self.game_id, review_id).await {
            Ok(mut review) => {
                debug!(
                    review_id = %review.id,
                    moves = review.moves.len(),
                    "Review fetched"
                );
                let last = self.last_move_number();
                let before = review.moves.len();
                review
                    .moves
                    .retain(|key, analysis| *key <= last && analysis.move_number <= last);
                if review.moves.len() < before {
                    warn!(
                        review_id = %review.id,
                        dropped = before - review.moves.len(),
                        last_move = last,
                        "Ignoring analysis past the end of the game"
                    );
                }
                self.active = Some(reconcile(review));
                self.update_count += 1;
            }
            Err(e) => {
                warn!(review_id = %review_id, "Failed to fetch review: {}", e);
            }
        }
    }

    pub async fn queue_review(&mut self, review_type: ReviewType) {
        let request = ReviewRequest {
            engine: self.engine.clone(),
            review_type,
        };
        match self.service.request_review(self.game_id, &request).await {
            Ok(response) if response.is_queued() => {
                info!(game_id = self.game_id, kind = %review_type, "Review queued");
                self.reviewing = true;
                self.status_message = Some(format!("Queued {} review", review_type));
            }
            Ok(_) => {
                debug!(game_id = self.game_id, "Review request was not accepted");
            }
            Err(e) => {
                warn!(game_id = self.game_id, "Failed to queue review: {}", e);
                self.status_message = Some(format!("Failed to queue review: {}", e));
            }
        }
    }

    /// Ask for a full review when only a fast one is shown.
    pub async fn request_full_review(&mut self) {
        if !self.can_request_full_review() {
            self.status_message = Some("A full review is already available".to_string());
            return;
        }
        self.queue_review(ReviewType::Full).await;
    }

    pub fn can_request_full_review(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|r| r.review().review_type == ReviewType::Fast)
    }

    pub async fn handle_push(&mut self, event: PushEvent) {
        match event {
            PushEvent::ReviewUpdated {
                ai_review_id,
                refresh,
            } => {
                if let Some(id) = ai_review_id {
                    self.load_review(&id).await;
                }
                if refresh {
                    self.load_reviews().await;
                }
            }
            PushEvent::MoveUpdated {
                move_number,
                analysis,
            } => {
                let last = self.last_move_number();
                if move_number > last {
                    warn!(
                        move_number,
                        last_move = last,
                        "Ignoring move update past the end of the game"
                    );
                    return;
                }
                if let Some(active) = self.active.as_mut() {
                    active.apply_move_update(move_number, analysis);
                    self.update_count += 1;
                }
            }
            PushEvent::MetadataUpdated(_) => {
                if self.active.is_some() {
                    debug!(game_id = self.game_id, "Review metadata changed");
                    self.update_count += 1;
                }
            }
        }
    }

    /// Move number of the last trunk move; analysis beyond it is ignored.
    pub fn last_move_number(&self) -> u32 {
        self.tree.move_number(self.tree.trunk_end())
    }

    /// Jump to trunk move `move_number` (clamped to the game).
    pub fn go_to_move(&mut self, move_number: u32) {
        self.cursor = self.tree.trunk_node(move_number);
    }

    pub fn next_move(&mut self) {
        if let Some(next) = self.tree.next(self.cursor) {
            self.cursor = next;
        }
    }

    pub fn prev_move(&mut self) {
        if let Some(parent) = self.tree.parent(self.cursor) {
            self.cursor = parent;
        }
    }

    pub fn go_to_start(&mut self) {
        self.cursor = self.tree.root();
    }

    pub fn go_to_end(&mut self) {
        self.cursor = self.tree.trunk_end();
    }

    /// Leave a variation and return to where it left the trunk.
    pub fn back_to_trunk(&mut self) {
        self.cursor = self.tree.branch_point(self.cursor);
    }

    /// Play `at` from the cursor, creating a variation when it leaves the trunk.
    pub fn play(&mut self, at: Intersection) -> Result<(), goban::GobanError> {
        let color = self.tree.color_to_move(self.cursor);
        let mut position = self.tree.position_at(self.cursor)?;
        if !at.is_pass() {
            if position.stone_at(at).is_some() {
                return Err(goban::GobanError::Occupied {
                    x: at.x,
                    y: at.y,
                });
            }
            position.play(color, at)?;
        }
        self.cursor = self.tree.play(self.cursor, at);
        Ok(())
    }

    /// Play the engine's preferred move at the current position.
    pub fn play_suggestion(&mut self) {
        let Some(analysis) = self.current_analysis() else {
            return;
        };
        if !self.tree.is_trunk(self.cursor) {
            return;
        }
        let Some(best) = analysis.variations.first().map(|v| v.mv) else {
            return;
        };
        if let Err(e) = self.play(best) {
            warn!("Engine suggestion is not playable: {}", e);
        }
    }

    /// Trunk move number the overlay and chart refer to.
    pub fn current_move_number(&self) -> u32 {
        self.tree.move_number(self.tree.branch_point(self.cursor))
    }

    pub fn current_analysis(&self) -> Option<&review::MoveAnalysis> {
        self.active
            .as_ref()?
            .move_analysis(self.current_move_number())
    }

    /// Overlay for the board at the cursor. Empty without an active review.
    pub fn annotation(&self) -> Annotation {
        match &self.active {
            Some(active) => annotate(active, &self.tree, self.cursor, self.tree.size()),
            None => Annotation::default(),
        }
    }

    pub fn chart_entries(&self) -> (Vec<DisplayEntry>, Vec<DisplayEntry>) {
        match &self.active {
            Some(active) => (active.display_entries(), active.highlighted_entries()),
            None => (Vec::new(), Vec::new()),
        }
    }

    /// Trunk move played after the cursor, in board coordinates (`D4`).
    pub fn next_move_coords(&self) -> Option<String> {
        let next = self.tree.trunk_next(self.cursor)?;
        Some(pretty_coords(self.tree.mv(next), self.tree.size().height))
    }
}
